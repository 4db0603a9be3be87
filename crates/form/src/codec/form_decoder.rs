//! [`Decoder`] adapter over [`FormParser`].
//!
//! Lets a form body be read from any [`AsyncRead`](tokio::io::AsyncRead) with
//! [`FramedRead`](tokio_util::codec::FramedRead). The decoder consumes every
//! byte it is handed and yields exactly one item, the [`FormData`], once the
//! reader reaches end of stream.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::FormParser;
use crate::config::FormConfig;
use crate::protocol::{FormData, FormError};

#[derive(Debug)]
pub struct FormDecoder {
    /// `None` once the form has been produced
    parser: Option<FormParser>,
}

impl FormDecoder {
    pub fn new(parser: FormParser) -> Self {
        Self { parser: Some(parser) }
    }

    /// Creates a decoder for a body of the given `Content-Type`.
    pub fn for_content_type(content_type: &str, config: &FormConfig) -> Result<Self, FormError> {
        FormParser::new(content_type, config).map(Self::new)
    }
}

impl Decoder for FormDecoder {
    type Item = FormData;
    type Error = FormError;

    /// Scans everything buffered so far, never yields an item before EOF.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(parser) = &mut self.parser else {
            // the form was already produced, whatever follows is ignored
            src.clear();
            return Ok(None);
        };

        if !src.is_empty() {
            trace!(len = src.len(), "decoding form bytes");
            parser.write(&src[..])?;
            src.clear();
        }

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decode(src)?;

        match self.parser.take() {
            Some(parser) => parser.finalize().map(Some),
            None => Ok(None),
        }
    }
}
