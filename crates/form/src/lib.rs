//! A streaming parser for HTTP form bodies
//!
//! This crate decodes `application/x-www-form-urlencoded` and
//! `multipart/form-data` request bodies as they arrive, chunk by chunk, without
//! buffering the whole body. File parts are written straight into an
//! [`UploadFile`](protocol::UploadFile) that lives in memory while it is small
//! and spills to a temporary file once it grows past a configurable limit.
//!
//! # Features
//!
//! - Chunk size independent results: a body fed one byte at a time parses the
//!   same as one fed in a single write
//! - Horspool style delimiter search inside multipart part bodies
//! - Ordered, duplicate preserving results through [`FormData`]
//! - Percent decoding and `charset` aware text decoding
//! - Optional `max_size` clipping and caller provided upload destinations
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::Request;
//! use http_body_util::Full;
//! use micro_form::{FormConfig, read_request_form};
//! use std::io::Read;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let body = "--X\r\n\
//!     Content-Disposition: form-data; name=\"title\"\r\n\r\n\
//!     Holiday\r\n\
//!     --X\r\n\
//!     Content-Disposition: form-data; name=\"photo\"; filename=\"beach.jpg\"\r\n\
//!     Content-Type: image/jpeg\r\n\r\n\
//!     <jpeg bytes>\r\n\
//!     --X--\r\n";
//!
//! let request = Request::builder()
//!     .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=X")
//!     .body(Full::new(Bytes::from(body)))
//!     .unwrap();
//!
//! let mut form = read_request_form(request, &FormConfig::default()).await.unwrap();
//! assert_eq!(form.get_text("title"), Some("Holiday"));
//!
//! let photo = form.get_file_mut("photo").unwrap();
//! assert_eq!(photo.filename(), "beach.jpg");
//! assert_eq!(photo.content_type(), "image/jpeg");
//!
//! let mut bytes = Vec::new();
//! photo.read_to_end(&mut bytes).unwrap();
//! assert_eq!(bytes, b"<jpeg bytes>");
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: the scanners, the sinks that assemble their events, and the
//!   [`FormParser`](codec::FormParser) that pairs them
//! - [`protocol`]: value and error types
//! - [`config`]: [`FormConfig`] limits and upload handling
//! - the `read_*` functions: async drivers over `http_body::Body` and
//!   `AsyncRead` sources
//!
//! # Error Handling
//!
//! Every failure is a [`FormError`]. Structural and decoding problems abort the
//! parse immediately and no partial form is returned;
//! [`FormError::is_invalid_encoding`] tells them apart from transport and local
//! I/O failures.
//!
//! # Limitations
//!
//! - Per part `Content-Transfer-Encoding` (base64, quoted-printable) is not decoded
//! - Supported charsets are UTF-8, ISO-8859-1 and US-ASCII
//! - Bytes beyond `max_size` are dropped, not rejected

pub mod codec;
pub mod config;
pub mod protocol;

mod reader;
mod utils;

pub use config::FormConfig;
pub use protocol::{FormData, FormError, FormValue, UploadFile};
pub use reader::{read_formdata, read_formdata_from_reader, read_request_form};
