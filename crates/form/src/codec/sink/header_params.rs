//! Parameter parsing for `Content-Disposition` style header values.
//!
//! Handles the forms browsers and HTTP clients actually send:
//!
//! - tokens: `name=field`
//! - quoted strings with backslash escapes: `filename="a \"quoted\" name.txt"`
//! - RFC 5987 extended values: `filename*=UTF-8''na%C3%AFve.txt`
//! - RFC 2231 continuations: `filename*0="long"; filename*1="name.txt"`

use std::collections::HashMap;

use crate::codec::sink::Charset;
use crate::codec::sink::percent::percent_decode;

/// The lower-cased parameters of a header value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct HeaderParams {
    params: HashMap<String, String>,
}

impl HeaderParams {
    /// Returns the parameter `name` (matched case-insensitively)
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.params.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Parses the parameters of `form-data; name="x"; filename="y"`, skipping the
/// leading value.
///
/// Malformed trailing input ends parsing; whatever was parsed before it is kept.
pub(crate) fn parse_options_header(header: &str) -> HeaderParams {
    let rest = header.split_once(';').map_or("", |(_, rest)| rest);

    let mut params = HashMap::new();
    let mut cursor = Cursor { input: rest, pos: 0 };

    loop {
        cursor.skip_while(|c| c.is_whitespace() || c == ';' || c == ',');
        if cursor.is_eof() {
            break;
        }

        let key = cursor.take_while(|c| !c.is_whitespace() && !matches!(c, ';' | ',' | '=' | '"'));
        if key.is_empty() {
            break;
        }

        cursor.skip_while(char::is_whitespace);
        if !cursor.eat('=') {
            // a bare flag without a value carries nothing we use
            continue;
        }
        cursor.skip_while(char::is_whitespace);

        let raw = if cursor.peek() == Some('"') {
            match cursor.quoted_string() {
                Some(raw) => raw,
                None => break,
            }
        } else {
            cursor.take_while(|c| c != ';' && c != ',').trim_end().to_owned()
        };

        let (name, extended) = ParamKey::parse(key);
        let decoded = if extended { decode_extended(&raw) } else { raw };

        match name {
            ParamKey::Plain(name) => {
                params.insert(name, decoded);
            }
            ParamKey::Continuation(name, 0) => {
                params.insert(name, decoded);
            }
            ParamKey::Continuation(name, _) => {
                params.entry(name).or_insert_with(String::new).push_str(&decoded);
            }
        }
    }

    HeaderParams { params }
}

enum ParamKey {
    Plain(String),
    Continuation(String, u32),
}

impl ParamKey {
    /// Parses `name`, `name*`, `name*N` and `name*N*`, returning the key and
    /// whether the value uses the extended `charset'lang'value` notation.
    fn parse(key: &str) -> (Self, bool) {
        let key = key.to_ascii_lowercase();
        let Some(star) = key.find('*') else {
            return (ParamKey::Plain(key), false);
        };
        let (name, suffix) = (&key[..star], &key[star + 1..]);

        if suffix.is_empty() {
            return (ParamKey::Plain(name.to_owned()), true);
        }

        let (index, extended) = match suffix.strip_suffix('*') {
            Some(index) => (index, true),
            None => (suffix, false),
        };

        match index.parse::<u32>() {
            Ok(index) => (ParamKey::Continuation(name.to_owned(), index), extended),
            Err(_) => (ParamKey::Plain(key.clone()), false),
        }
    }
}

/// Decodes `charset'language'percent-encoded` values.
///
/// Continuation segments after the first carry no charset prefix and are
/// decoded as UTF-8. Values that fail to decode are kept verbatim.
fn decode_extended(raw: &str) -> String {
    let (charset, encoded) = match raw.splitn(3, '\'').collect::<Vec<_>>()[..] {
        [charset, _language, encoded] => (Charset::from_label(charset), encoded),
        _ => (Some(Charset::Utf8), raw),
    };

    let Some(charset) = charset else {
        return raw.to_owned();
    };

    percent_decode(encoded.as_bytes(), false)
        .and_then(|bytes| charset.decode(bytes))
        .unwrap_or_else(|_| raw.to_owned())
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c| !predicate(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) {
        self.take_while(predicate);
    }

    /// Reads a quoted string starting at the opening quote, unescaping `\x`.
    fn quoted_string(&mut self) -> Option<String> {
        self.eat('"');
        let mut out = String::new();
        let mut chars = self.rest().char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Some(out);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => return None,
                },
                c => out.push(c),
            }
        }

        None
    }
}
