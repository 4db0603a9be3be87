//! Percent decoding for urlencoded fields and RFC 5987 extended parameters.

use memchr::{memchr, memchr2};

use crate::protocol::FormError;

/// Decodes `%XX` escapes, and `+` as space when `plus_as_space` is set.
///
/// A `%` that is not followed by two hex digits is rejected.
pub(crate) fn percent_decode(input: &[u8], plus_as_space: bool) -> Result<Vec<u8>, FormError> {
    let has_escape = if plus_as_space { memchr2(b'%', b'+', input).is_some() } else { memchr(b'%', input).is_some() };
    if !has_escape {
        return Ok(input.to_vec());
    }

    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let escape = input.get(i + 1..i + 3).ok_or_else(|| truncated_escape(i))?;
                match (hex_value(escape[0]), hex_value(escape[1])) {
                    (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                    _ => {
                        return Err(FormError::decode(format!(
                            "invalid percent escape {:?} at offset {i}",
                            String::from_utf8_lossy(&input[i..i + 3])
                        )));
                    }
                }
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn truncated_escape(offset: usize) -> FormError {
    FormError::decode(format!("truncated percent escape at offset {offset}"))
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
