use tracing::trace;

use crate::codec::sink::percent::percent_decode;
use crate::codec::sink::{Charset, FormSink};
use crate::protocol::{FormData, FormError};

/// Assembles `application/x-www-form-urlencoded` fields.
///
/// Name and value fragments are buffered raw until the field ends, because a
/// `%XX` escape or a multi-byte character may straddle two chunks.
#[derive(Debug, Default)]
pub struct QueryStringSink {
    charset: Charset,
    name: Vec<u8>,
    value: Vec<u8>,
    form: FormData,
}

impl QueryStringSink {
    pub fn new(charset: Charset) -> Self {
        Self { charset, ..Self::default() }
    }

    /// Returns the fields assembled so far
    pub fn into_form(self) -> FormData {
        self.form
    }
}

impl FormSink for QueryStringSink {
    fn on_field_name(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.name.extend_from_slice(data);
        Ok(())
    }

    fn on_field_data(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.value.extend_from_slice(data);
        Ok(())
    }

    fn on_field_end(&mut self) -> Result<(), FormError> {
        let name = self.charset.decode(percent_decode(&self.name, true)?)?;
        let value = self.charset.decode(percent_decode(&self.value, true)?)?;
        trace!(name = %name, value_len = value.len(), "decoded urlencoded field");

        self.form.append(name, value);
        self.name.clear();
        self.value.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(sink: &mut QueryStringSink, name: &[&[u8]], value: &[&[u8]]) {
        sink.on_field_start().unwrap();
        name.iter().for_each(|part| sink.on_field_name(part).unwrap());
        value.iter().for_each(|part| sink.on_field_data(part).unwrap());
        sink.on_field_end().unwrap();
    }

    #[test]
    fn test_fragments_are_joined() {
        let mut sink = QueryStringSink::new(Charset::Utf8);
        field(&mut sink, &[b"na", b"me"], &[b"bo", b"b"]);

        let form = sink.into_form();
        assert_eq!(form.get_text("name"), Some("bob"));
    }

    #[test]
    fn test_escape_split_across_fragments() {
        let mut sink = QueryStringSink::new(Charset::Utf8);
        // "€" is %E2%82%AC, cut in the middle of the second escape
        field(&mut sink, &[b"price"], &[b"10+%E2%8", b"2%AC"]);

        let form = sink.into_form();
        assert_eq!(form.get_text("price"), Some("10 €"));
    }

    #[test]
    fn test_latin1_charset() {
        let mut sink = QueryStringSink::new(Charset::Latin1);
        field(&mut sink, &[b"city"], &[b"Z%FCrich"]);

        assert_eq!(sink.into_form().get_text("city"), Some("Zürich"));
    }

    #[test]
    fn test_empty_value() {
        let mut sink = QueryStringSink::new(Charset::Utf8);
        field(&mut sink, &[b"blank"], &[]);

        assert_eq!(sink.into_form().get_text("blank"), Some(""));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let mut sink = QueryStringSink::new(Charset::Utf8);
        sink.on_field_name(b"bad").unwrap();
        sink.on_field_data(b"%FF").unwrap();

        assert!(matches!(sink.on_field_end(), Err(FormError::Decode { .. })));
    }
}
