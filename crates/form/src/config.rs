//! Parser configuration.

use std::fmt;
use std::fs::File;
use std::io;
use std::sync::Arc;

/// Default threshold above which an in-memory file part spills to disk (1MB).
pub const DEFAULT_FILE_MEMORY_LIMIT: usize = 1024 * 1024;

/// Factory for upload destinations.
///
/// Called with the client supplied filename of every file part; the returned
/// file receives the part body and is handed back to the caller inside the
/// form. It must be readable as well as writable.
pub type UploadTo = Arc<dyn Fn(&str) -> io::Result<File> + Send + Sync>;

/// Limits and upload handling for one form body parse.
#[derive(Clone)]
pub struct FormConfig {
    /// Maximum number of body bytes fed to the scanner, `0` means unbounded.
    max_size: usize,
    /// Destination factory used instead of in-memory buffering for file parts.
    upload_to: Option<UploadTo>,
    /// Threshold above which an in-memory file part spills to a temporary file.
    file_memory_limit: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { max_size: 0, upload_to: None, file_memory_limit: DEFAULT_FILE_MEMORY_LIMIT }
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("max_size", &self.max_size)
            .field("upload_to", &self.upload_to.as_ref().map(|_| "Fn(&str) -> File"))
            .field("file_memory_limit", &self.file_memory_limit)
            .finish()
    }
}

impl FormConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of body bytes to parse.
    ///
    /// Bytes past the limit are dropped, not rejected: the form is built from
    /// the first `max_size` bytes only.
    #[must_use]
    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Route every file part to a file produced by `upload_to`.
    #[must_use]
    pub fn upload_to<F>(mut self, upload_to: F) -> Self
    where
        F: Fn(&str) -> io::Result<File> + Send + Sync + 'static,
    {
        self.upload_to = Some(Arc::new(upload_to));
        self
    }

    /// Set the in-memory threshold for file parts, `0` keeps them in memory.
    #[must_use]
    pub fn file_memory_limit(mut self, size: usize) -> Self {
        self.file_memory_limit = size;
        self
    }

    #[must_use]
    pub fn get_max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn get_upload_to(&self) -> Option<&UploadTo> {
        self.upload_to.as_ref()
    }

    #[must_use]
    pub fn get_file_memory_limit(&self) -> usize {
        self.file_memory_limit
    }
}
