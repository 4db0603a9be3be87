//! Event consumers that assemble a [`FormData`](crate::protocol::FormData).
//!
//! The scanners know nothing about names, charsets or files: they report what
//! they see through the fixed set of callbacks on [`FormSink`]. The two sinks
//! here turn those callbacks into form entries.
//!
//! - [`QueryStringSink`]: percent- and charset-decodes urlencoded fields
//! - [`MultipartSink`]: collects part headers and materializes text and file parts

mod charset;
mod header_params;
mod multipart_sink;
mod percent;
mod query_sink;

pub use charset::Charset;
pub use multipart_sink::MultipartSink;
pub use query_sink::QueryStringSink;

pub(crate) use header_params::parse_options_header;

use crate::protocol::{Event, FormError};

/// Consumer of scanner events, one operation per event kind.
///
/// Every operation defaults to doing nothing, so a sink only implements the
/// events its format produces. Data slices borrow from the scanner's current
/// chunk and are only valid for the duration of the call.
#[cfg_attr(test, mockall::automock)]
pub trait FormSink {
    fn on_field_start(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_field_name(&mut self, _data: &[u8]) -> Result<(), FormError> {
        Ok(())
    }

    fn on_field_data(&mut self, _data: &[u8]) -> Result<(), FormError> {
        Ok(())
    }

    fn on_field_end(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_part_begin(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_header_field(&mut self, _data: &[u8]) -> Result<(), FormError> {
        Ok(())
    }

    fn on_header_value(&mut self, _data: &[u8]) -> Result<(), FormError> {
        Ok(())
    }

    fn on_header_end(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_headers_finished(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_part_data(&mut self, _data: &[u8]) -> Result<(), FormError> {
        Ok(())
    }

    fn on_part_end(&mut self) -> Result<(), FormError> {
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), FormError> {
        Ok(())
    }
}

/// Routes one event to the matching sink operation.
///
/// Empty data slices are dropped here, so sinks never see zero-length
/// fragments.
pub(crate) fn dispatch<S: FormSink + ?Sized>(sink: &mut S, event: Event<'_>) -> Result<(), FormError> {
    match event {
        Event::FieldStart => sink.on_field_start(),
        Event::FieldName(data) if !data.is_empty() => sink.on_field_name(data),
        Event::FieldData(data) if !data.is_empty() => sink.on_field_data(data),
        Event::FieldEnd => sink.on_field_end(),
        Event::PartBegin => sink.on_part_begin(),
        Event::HeaderField(data) if !data.is_empty() => sink.on_header_field(data),
        Event::HeaderValue(data) if !data.is_empty() => sink.on_header_value(data),
        Event::HeaderEnd => sink.on_header_end(),
        Event::HeadersFinished => sink.on_headers_finished(),
        Event::PartData(data) if !data.is_empty() => sink.on_part_data(data),
        Event::PartEnd => sink.on_part_end(),
        Event::End => sink.on_end(),
        Event::FieldName(_) | Event::FieldData(_) | Event::HeaderField(_) | Event::HeaderValue(_) | Event::PartData(_) => {
            Ok(())
        }
    }
}

/// A sink that records every event it receives, used by the scanner tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    pub(crate) events: Vec<(&'static str, Vec<u8>)>,
}

#[cfg(test)]
impl EventLog {
    fn record(&mut self, kind: &'static str, data: &[u8]) -> Result<(), FormError> {
        // adjacent fragments of the same kind are merged, so the log does not
        // depend on how the body was chunked
        match self.events.last_mut() {
            Some((last, buf)) if *last == kind && !data.is_empty() && !buf.is_empty() => buf.extend_from_slice(data),
            _ => self.events.push((kind, data.to_vec())),
        }
        Ok(())
    }

    /// Event kinds in order, with merged data rendered lossily
    pub(crate) fn rendered(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|(kind, data)| {
                if data.is_empty() { (*kind).to_string() } else { format!("{kind}:{}", String::from_utf8_lossy(data)) }
            })
            .collect()
    }
}

#[cfg(test)]
impl FormSink for EventLog {
    fn on_field_start(&mut self) -> Result<(), FormError> {
        self.record("field_start", b"")
    }

    fn on_field_name(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.record("field_name", data)
    }

    fn on_field_data(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.record("field_data", data)
    }

    fn on_field_end(&mut self) -> Result<(), FormError> {
        self.record("field_end", b"")
    }

    fn on_part_begin(&mut self) -> Result<(), FormError> {
        self.record("part_begin", b"")
    }

    fn on_header_field(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.record("header_field", data)
    }

    fn on_header_value(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.record("header_value", data)
    }

    fn on_header_end(&mut self) -> Result<(), FormError> {
        self.record("header_end", b"")
    }

    fn on_headers_finished(&mut self) -> Result<(), FormError> {
        self.record("headers_finished", b"")
    }

    fn on_part_data(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.record("part_data", data)
    }

    fn on_part_end(&mut self) -> Result<(), FormError> {
        self.record("part_end", b"")
    }

    fn on_end(&mut self) -> Result<(), FormError> {
        self.record("end", b"")
    }
}
