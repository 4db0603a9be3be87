//! Async entry points that pump a request body through a [`FormParser`].
//!
//! The only suspension point is waiting for the next chunk of the body; the
//! scanning itself is synchronous. Dropping the returned future abandons the
//! parse, which also drops and closes any file part opened so far.

use std::pin::pin;

use bytes::Buf;
use futures::StreamExt;
use http::Request;
use http::header::CONTENT_TYPE;
use http_body::Body;
use http_body_util::BodyExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use tracing::{trace, warn};

use crate::codec::{FormDecoder, FormParser};
use crate::config::FormConfig;
use crate::protocol::{BoxError, FormData, FormError};

/// Reads a whole form body.
///
/// The parser is selected from `content_type` before the first frame is
/// polled, so a `multipart/form-data` type without a usable boundary fails
/// without touching the body. Trailer frames are ignored.
///
/// # Example
///
/// ```
/// use http_body_util::Full;
/// use micro_form::{FormConfig, read_formdata};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let body = Full::new(&b"name=ferris&lang=rust"[..]);
/// let form = read_formdata("application/x-www-form-urlencoded", body, &FormConfig::default()).await.unwrap();
///
/// assert_eq!(form.get_text("name"), Some("ferris"));
/// # }
/// ```
pub async fn read_formdata<B>(content_type: &str, body: B, config: &FormConfig) -> Result<FormData, FormError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let mut parser = FormParser::new(content_type, config)?;
    let mut body = pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(FormError::body)?;
        let Ok(mut data) = frame.into_data() else {
            continue;
        };

        while data.has_remaining() {
            let chunk = data.chunk();
            let len = chunk.len();
            trace!(len, "received form body chunk");
            parser.write(chunk)?;
            data.advance(len);
        }
    }

    if parser.is_truncated() {
        warn!(max_size = config.get_max_size(), "form body exceeded max_size, the rest was ignored");
    }

    parser.finalize()
}

/// Reads the form body of `request`, using its `Content-Type` header.
///
/// A request without a readable `Content-Type` is read as urlencoded.
pub async fn read_request_form<B>(request: Request<B>, config: &FormConfig) -> Result<FormData, FormError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = request.into_parts();
    let content_type = parts.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).unwrap_or_default();

    read_formdata(content_type, body, config).await
}

/// Reads a form body from a raw byte reader, such as a file or a socket half.
pub async fn read_formdata_from_reader<R>(content_type: &str, reader: R, config: &FormConfig) -> Result<FormData, FormError>
where
    R: AsyncRead,
{
    let decoder = FormDecoder::for_content_type(content_type, config)?;
    let mut framed = pin!(FramedRead::new(reader, decoder));

    match framed.next().await {
        Some(result) => result,
        None => Err(FormError::unknown_state("reader ended without producing a form")),
    }
}
