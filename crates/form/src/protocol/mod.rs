//! Value types shared by the scanners, the sinks and the callers.
//!
//! - [`Event`]: one parsing fact, borrowing its bytes from the current chunk
//! - [`FormData`] / [`FormValue`]: the assembled, ordered multimap result
//! - [`UploadFile`]: a file part, held in memory or spilled to disk
//! - [`FormError`]: every way a parse can fail

mod event;
pub use event::Event;

mod form_data;
pub use form_data::FormData;
pub use form_data::FormValue;
pub use form_data::Iter;
pub use form_data::IterMut;

mod upload_file;
pub use upload_file::UploadFile;

mod error;
pub use error::BoxError;
pub use error::FormError;
