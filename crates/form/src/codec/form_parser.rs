//! Content type driven pairing of a scanner with its sink.
//!
//! [`FormParser`] is the synchronous core of form reading: it picks the
//! scanner and sink for the declared media type, validates the parameters the
//! scanner depends on, and then simply forwards chunks until the body ends.

use mime::Mime;
use tracing::debug;

use crate::codec::scanner::{MultipartScanner, QueryStringScanner};
use crate::codec::sink::{Charset, MultipartSink, QueryStringSink, parse_options_header};
use crate::config::FormConfig;
use crate::protocol::{FormData, FormError};

/// Parses one form body, chunk by chunk.
///
/// # Example
///
/// ```
/// use micro_form::FormConfig;
/// use micro_form::codec::FormParser;
///
/// let mut parser = FormParser::new("application/x-www-form-urlencoded", &FormConfig::default()).unwrap();
/// parser.write(b"name=fer").unwrap();
/// parser.write(b"ris&lang=rust").unwrap();
///
/// let form = parser.finalize().unwrap();
/// assert_eq!(form.get_text("name"), Some("ferris"));
/// assert_eq!(form.get_text("lang"), Some("rust"));
/// ```
#[derive(Debug)]
pub struct FormParser {
    kind: Kind,
}

#[derive(Debug)]
enum Kind {
    /// `application/x-www-form-urlencoded`, also used for unknown media types
    Query { scanner: QueryStringScanner, sink: QueryStringSink },

    /// `multipart/form-data`
    Multipart { scanner: MultipartScanner, sink: MultipartSink },
}

impl FormParser {
    /// Selects the parser for a `Content-Type` header value.
    ///
    /// `multipart/form-data` requires a `boundary` parameter; every other
    /// media type, including an empty or unparseable one, is read as
    /// urlencoded. The `charset` parameter selects the text encoding and
    /// defaults to UTF-8.
    pub fn new(content_type: &str, config: &FormConfig) -> Result<Self, FormError> {
        // parameters are parsed leniently: real boundaries often contain
        // characters a strict media type parser rejects
        let params = parse_options_header(content_type);
        let charset = params.get("charset").map(Charset::try_from_label).transpose()?.unwrap_or_default();

        if !is_multipart(content_type) {
            debug!(content_type, ?charset, "reading urlencoded form");
            return Ok(Self::urlencoded(charset, config));
        }

        let boundary = params
            .get("boundary")
            .filter(|boundary| !boundary.is_empty())
            .ok_or_else(|| FormError::malformed_boundary("multipart/form-data without a boundary parameter"))?;

        debug!(boundary, ?charset, "reading multipart form");
        Self::multipart(boundary.as_bytes(), charset, config)
    }

    pub fn urlencoded(charset: Charset, config: &FormConfig) -> Self {
        Self {
            kind: Kind::Query {
                scanner: QueryStringScanner::new(config.get_max_size()),
                sink: QueryStringSink::new(charset),
            },
        }
    }

    pub fn multipart(boundary: &[u8], charset: Charset, config: &FormConfig) -> Result<Self, FormError> {
        Ok(Self {
            kind: Kind::Multipart {
                scanner: MultipartScanner::new(boundary, config.get_max_size())?,
                sink: MultipartSink::new(charset, config),
            },
        })
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.kind, Kind::Multipart { .. })
    }

    /// Whether `max_size` clipped the body so far
    pub fn is_truncated(&self) -> bool {
        match &self.kind {
            Kind::Query { scanner, .. } => scanner.is_truncated(),
            Kind::Multipart { scanner, .. } => scanner.is_truncated(),
        }
    }

    /// Feeds the next chunk of the body.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), FormError> {
        match &mut self.kind {
            Kind::Query { scanner, sink } => scanner.write(chunk, sink),
            Kind::Multipart { scanner, sink } => scanner.write(chunk, sink),
        }
    }

    /// Ends the body and returns the assembled form.
    pub fn finalize(self) -> Result<FormData, FormError> {
        match self.kind {
            Kind::Query { scanner, mut sink } => {
                scanner.finalize(&mut sink)?;
                Ok(sink.into_form())
            }
            Kind::Multipart { scanner, mut sink } => {
                scanner.finalize(&mut sink)?;
                Ok(sink.into_form())
            }
        }
    }
}

fn is_multipart(content_type: &str) -> bool {
    match content_type.parse::<Mime>() {
        Ok(media) => media.type_() == mime::MULTIPART && media.subtype() == mime::FORM_DATA,
        Err(_) => {
            let essence = content_type.split(';').next().unwrap_or_default().trim();
            essence.eq_ignore_ascii_case(mime::MULTIPART_FORM_DATA.essence_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use indoc::indoc;

    use super::*;

    fn parse(content_type: &str, body: &[u8]) -> Result<FormData, FormError> {
        let mut parser = FormParser::new(content_type, &FormConfig::default())?;
        parser.write(body)?;
        parser.finalize()
    }

    #[test]
    fn test_urlencoded_fields() {
        let form = parse("application/x-www-form-urlencoded", b"foo=bar&baz=qux").unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get_text("foo"), Some("bar"));
        assert_eq!(form.get_text("baz"), Some("qux"));
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let form = parse("application/x-www-form-urlencoded", b"a=1&a=2").unwrap();
        let values: Vec<_> = form.get_all("a").filter_map(|v| v.as_text()).collect();
        assert_eq!(values, ["1", "2"]);
    }

    #[test]
    fn test_percent_encoded_utf8() {
        let form = parse("application/x-www-form-urlencoded", b"city=M%C3%BCnchen&greeting=%E4%BD%A0%E5%A5%BD").unwrap();
        assert_eq!(form.get_text("city"), Some("München"));
        assert_eq!(form.get_text("greeting"), Some("你好"));
    }

    #[test]
    fn test_unknown_media_type_reads_urlencoded() {
        for content_type in ["", "text/plain", "not a media type"] {
            let form = parse(content_type, b"k=v").unwrap();
            assert_eq!(form.get_text("k"), Some("v"), "content type {content_type:?}");
        }
    }

    #[test]
    fn test_charset_parameter() {
        let form = parse("application/x-www-form-urlencoded; charset=ISO-8859-1", b"name=Jos%E9").unwrap();
        assert_eq!(form.get_text("name"), Some("José"));

        let error = FormParser::new("application/x-www-form-urlencoded; charset=klingon", &FormConfig::default()).unwrap_err();
        assert!(matches!(error, FormError::Decode { .. }));
    }

    #[test]
    fn test_multipart_text_and_file() {
        let body = indoc! {r#"
        --X
        Content-Disposition: form-data; name="name"

        value
        --X
        Content-Disposition: form-data; name="file"; filename="x.txt"
        Content-Type: text/plain

        hello
        --X--"#}
        .replace('\n', "\r\n");

        let mut form = parse("multipart/form-data; boundary=X", body.as_bytes()).unwrap();
        assert_eq!(form.get_text("name"), Some("value"));

        let file = form.get_file_mut("file").unwrap();
        assert_eq!(file.filename(), "x.txt");
        assert_eq!(file.content_type(), "text/plain");

        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"hello");
    }

    #[test]
    fn test_multipart_media_type_is_case_insensitive() {
        let parser = FormParser::new("Multipart/Form-Data; Boundary=\"abc\"", &FormConfig::default()).unwrap();
        assert!(parser.is_multipart());

        // `=` is not allowed in an unquoted token, but clients send it anyway
        let parser = FormParser::new("multipart/form-data; boundary=a=b", &FormConfig::default()).unwrap();
        assert!(parser.is_multipart());
    }

    #[test]
    fn test_missing_boundary_is_rejected_up_front() {
        for content_type in ["multipart/form-data", "multipart/form-data; boundary=", "multipart/form-data; charset=utf-8"] {
            let error = FormParser::new(content_type, &FormConfig::default()).unwrap_err();
            assert!(matches!(error, FormError::MalformedBoundary { .. }), "content type {content_type:?}");
        }
    }

    #[test]
    fn test_boundary_too_long() {
        let content_type = format!("multipart/form-data; boundary={}", "b".repeat(71));
        assert!(matches!(FormParser::new(&content_type, &FormConfig::default()), Err(FormError::MalformedBoundary { .. })));
    }

    #[test]
    fn test_max_size_truncates() {
        let config = FormConfig::new().max_size(11);
        let mut parser = FormParser::new("application/x-www-form-urlencoded", &config).unwrap();
        parser.write(b"first=1&second=2").unwrap();
        assert!(parser.is_truncated());

        let form = parser.finalize().unwrap();
        assert_eq!(form.get_text("first"), Some("1"));
        assert_eq!(form.get_text("sec"), Some(""));
        assert!(!form.contains_key("second"));
    }

    #[test]
    fn test_structural_error_is_reported() {
        let result = parse("multipart/form-data; boundary=X", b"--X\r\nNo colon here\r\n\r\n");
        assert!(result.unwrap_err().is_invalid_encoding());
    }
}
