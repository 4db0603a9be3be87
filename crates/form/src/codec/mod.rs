//! Streaming form body decoding
//!
//! Decoding is split into two layers that talk through a fixed event
//! interface:
//!
//! - [`scanner`]: byte level state machines that find field and part
//!   boundaries, part headers and raw data, without copying body bytes
//! - [`sink`]: consumers of the scanner events that decode names and values
//!   and materialize file parts
//!
//! On top of them, [`FormParser`] pairs the right scanner and sink for a
//! `Content-Type`, and [`FormDecoder`] exposes a parser as a
//! `tokio_util` [`Decoder`](tokio_util::codec::Decoder).
//!
//! # Example
//!
//! ```
//! use micro_form::FormConfig;
//! use micro_form::codec::FormParser;
//!
//! let body = b"--b\r\nContent-Disposition: form-data; name=\"lang\"\r\n\r\nrust\r\n--b--\r\n";
//!
//! let mut parser = FormParser::new("multipart/form-data; boundary=b", &FormConfig::default()).unwrap();
//! for chunk in body.chunks(5) {
//!     parser.write(chunk).unwrap();
//! }
//!
//! let form = parser.finalize().unwrap();
//! assert_eq!(form.get_text("lang"), Some("rust"));
//! ```

pub mod scanner;
pub mod sink;

mod form_decoder;
mod form_parser;

pub use form_decoder::FormDecoder;
pub use form_parser::FormParser;
