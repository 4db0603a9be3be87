//! Byte level scanners for form bodies.
//!
//! A scanner only recognizes structure: field and part boundaries, header
//! names and values, and the raw bytes in between. Everything it finds is
//! reported to a [`FormSink`](crate::codec::sink::FormSink) as borrowed slices
//! of the chunk being written.
//!
//! Both scanners accept input in chunks of any size, including empty ones, and
//! produce the same sequence of facts no matter where the chunks are split.
//!
//! - [`QueryStringScanner`]: `application/x-www-form-urlencoded`
//! - [`MultipartScanner`]: `multipart/form-data`

mod limit;
mod multipart_scanner;
mod query_scanner;

pub use multipart_scanner::{MAX_BOUNDARY_LEN, MultipartScanner};
pub use query_scanner::QueryStringScanner;
