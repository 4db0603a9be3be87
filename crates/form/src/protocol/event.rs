use std::fmt;

/// One parsing fact produced by a scanner.
///
/// Data carrying variants borrow from the chunk that is currently being
/// written (or from the multipart lookbehind buffer), so no event ever owns
/// a copy of the body bytes. A sink that needs the bytes after the callback
/// returns must copy them itself.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A new urlencoded field starts
    FieldStart,
    /// A fragment of the (still percent-encoded) field name
    FieldName(&'a [u8]),
    /// A fragment of the (still percent-encoded) field value
    FieldData(&'a [u8]),
    /// The current urlencoded field is complete
    FieldEnd,
    /// A new multipart part starts, its headers follow
    PartBegin,
    /// A fragment of a part header name
    HeaderField(&'a [u8]),
    /// A fragment of a part header value
    HeaderValue(&'a [u8]),
    /// The current part header line is complete
    HeaderEnd,
    /// The blank line after the part headers was seen
    HeadersFinished,
    /// A fragment of the part body
    PartData(&'a [u8]),
    /// The current part is complete
    PartEnd,
    /// The body is complete
    End,
}

impl<'a> Event<'a> {
    /// Returns the borrowed bytes for data carrying events
    pub fn data(&self) -> Option<&'a [u8]> {
        match *self {
            Event::FieldName(data)
            | Event::FieldData(data)
            | Event::HeaderField(data)
            | Event::HeaderValue(data)
            | Event::PartData(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the name of the event kind, used for tracing
    pub fn kind(&self) -> &'static str {
        match self {
            Event::FieldStart => "field_start",
            Event::FieldName(_) => "field_name",
            Event::FieldData(_) => "field_data",
            Event::FieldEnd => "field_end",
            Event::PartBegin => "part_begin",
            Event::HeaderField(_) => "header_field",
            Event::HeaderValue(_) => "header_value",
            Event::HeaderEnd => "header_end",
            Event::HeadersFinished => "headers_finished",
            Event::PartData(_) => "part_data",
            Event::PartEnd => "part_end",
            Event::End => "end",
        }
    }

    /// Returns true if this event carries a byte slice
    #[inline]
    pub fn is_data(&self) -> bool {
        self.data().is_some()
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{}({:?})", self.kind(), String::from_utf8_lossy(data)),
            None => f.write_str(self.kind()),
        }
    }
}
