use memchr::{memchr, memchr2};
use tracing::trace;

use crate::codec::scanner::limit::SizeLimit;
use crate::codec::sink::{FormSink, dispatch};
use crate::protocol::{Event, FormError};
use QueryState::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    /// Skip separators between fields
    BeforeField,
    /// Inside a field name, up to `=` or a separator
    FieldName,
    /// Inside a field value, up to a separator
    FieldData,
}

/// Incremental `application/x-www-form-urlencoded` scanner.
///
/// Fields are separated by `&` or `;`. Names and values are reported still
/// percent-encoded; decoding is up to the sink.
#[derive(Debug)]
pub struct QueryStringScanner {
    state: QueryState,
    limit: SizeLimit,
}

impl QueryStringScanner {
    pub fn new(max_size: usize) -> Self {
        Self { state: BeforeField, limit: SizeLimit::new(max_size) }
    }

    /// Whether `max_size` clipped any of the written input
    pub fn is_truncated(&self) -> bool {
        self.limit.is_truncated()
    }

    /// Scans one chunk of the body.
    pub fn write<S: FormSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> Result<(), FormError> {
        let len = self.limit.admit(data.len());
        let data = &data[..len];
        trace!(len, state = ?self.state, "scanning urlencoded chunk");

        let mut i = 0;
        while i < len {
            let rest = &data[i..];

            match self.state {
                BeforeField => {
                    if !is_separator(rest[0]) {
                        dispatch(sink, Event::FieldStart)?;
                        self.state = FieldName;
                        continue;
                    }
                    i += 1;
                }

                FieldName => {
                    let separator = memchr2(b'&', b';', rest);
                    let name_end = separator.unwrap_or(rest.len());

                    match (memchr(b'=', &rest[..name_end]), separator) {
                        (Some(equals), _) => {
                            dispatch(sink, Event::FieldName(&rest[..equals]))?;
                            self.state = FieldData;
                            i += equals + 1;
                        }
                        (None, Some(separator)) => {
                            // a bare name is a field with an empty value
                            dispatch(sink, Event::FieldName(&rest[..separator]))?;
                            dispatch(sink, Event::FieldEnd)?;
                            self.state = BeforeField;
                            i += separator + 1;
                        }
                        (None, None) => {
                            dispatch(sink, Event::FieldName(rest))?;
                            i = len;
                        }
                    }
                }

                FieldData => match memchr2(b'&', b';', rest) {
                    Some(separator) => {
                        dispatch(sink, Event::FieldData(&rest[..separator]))?;
                        dispatch(sink, Event::FieldEnd)?;
                        self.state = BeforeField;
                        i += separator + 1;
                    }
                    None => {
                        dispatch(sink, Event::FieldData(rest))?;
                        i = len;
                    }
                },
            }
        }

        Ok(())
    }

    /// Finishes the scan, closing a field that was still open at the end of
    /// the body.
    pub fn finalize<S: FormSink + ?Sized>(self, sink: &mut S) -> Result<(), FormError> {
        trace!(state = ?self.state, truncated = self.is_truncated(), "finalizing urlencoded scanner");

        if matches!(self.state, FieldName | FieldData) {
            dispatch(sink, Event::FieldEnd)?;
        }
        dispatch(sink, Event::End)
    }
}

#[inline]
fn is_separator(b: u8) -> bool {
    b == b'&' || b == b';'
}
