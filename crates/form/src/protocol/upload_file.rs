//! File parts of a multipart body.
//!
//! An [`UploadFile`] starts its life inside the multipart sink, which writes the
//! part body into it as data arrives. Small uploads stay in memory; once the
//! configured memory limit would be exceeded the bytes spill to a temporary
//! file. When the part ends the handle is rewound and handed to the caller
//! through [`FormData`](crate::protocol::FormData).

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

/// A readable handle over an uploaded file part.
///
/// Dropping the handle closes it; a temporary spill file is removed from disk
/// at the same time. Files obtained from an `upload_to` factory are left in
/// place.
#[derive(Debug)]
pub struct UploadFile {
    filename: String,
    content_type: String,
    memory_limit: usize,
    storage: PartStorage,
}

/// Where the bytes of a file part currently live.
#[derive(Debug)]
enum PartStorage {
    /// Buffered in memory, below the memory limit
    InMemory(Cursor<Vec<u8>>),
    /// Backed by a file on disk
    Spilled(SpillFile),
}

#[derive(Debug)]
struct SpillFile {
    file: File,
    /// Set for temporary files owned by the handle, removed on drop
    temp_path: Option<PathBuf>,
}

impl UploadFile {
    /// Creates an in-memory upload that spills to a temporary file once it grows
    /// beyond `memory_limit` bytes. A limit of `0` never spills.
    pub fn in_memory(filename: impl Into<String>, content_type: impl Into<String>, memory_limit: usize) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            memory_limit,
            storage: PartStorage::InMemory(Cursor::new(Vec::new())),
        }
    }

    /// Wraps a caller provided destination file.
    ///
    /// The file must be opened for both reading and writing, since the parser
    /// writes the part into it and the caller reads it back afterwards.
    pub fn with_file(file: File, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            memory_limit: 0,
            storage: PartStorage::Spilled(SpillFile { file, temp_path: None }),
        }
    }

    /// The filename the client sent in `Content-Disposition`
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The `Content-Type` of the part
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns true if the bytes live in a file rather than in memory
    pub fn is_spilled(&self) -> bool {
        matches!(self.storage, PartStorage::Spilled(_))
    }

    /// Path of the temporary spill file, if the handle owns one
    pub fn temp_path(&self) -> Option<&Path> {
        match &self.storage {
            PartStorage::Spilled(spill) => spill.temp_path.as_deref(),
            PartStorage::InMemory(_) => None,
        }
    }

    /// Total size of the stored bytes
    pub fn size(&self) -> io::Result<u64> {
        match &self.storage {
            PartStorage::InMemory(cursor) => Ok(cursor.get_ref().len() as u64),
            PartStorage::Spilled(spill) => spill.file.metadata().map(|m| m.len()),
        }
    }

    /// Reads the whole upload from the start, leaving the cursor at the end.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.rewind()?;
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn spill(&mut self) -> io::Result<()> {
        let PartStorage::InMemory(cursor) = &self.storage else {
            return Ok(());
        };

        let (path, mut file) = create_spill_file()?;
        debug!(filename = %self.filename, path = %path.display(), limit = self.memory_limit, "spilling upload to temporary file");

        file.write_all(cursor.get_ref())?;
        file.seek(SeekFrom::Start(cursor.position()))?;
        self.storage = PartStorage::Spilled(SpillFile { file, temp_path: Some(path) });
        Ok(())
    }
}

impl Write for UploadFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let PartStorage::InMemory(cursor) = &self.storage {
            let next_size = cursor.get_ref().len().saturating_add(buf.len());
            if self.memory_limit > 0 && next_size > self.memory_limit {
                self.spill()?;
            }
        }

        match &mut self.storage {
            PartStorage::InMemory(cursor) => cursor.write(buf),
            PartStorage::Spilled(spill) => spill.file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.storage {
            PartStorage::InMemory(_) => Ok(()),
            PartStorage::Spilled(spill) => spill.file.flush(),
        }
    }
}

impl Read for UploadFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.storage {
            PartStorage::InMemory(cursor) => cursor.read(buf),
            PartStorage::Spilled(spill) => spill.file.read(buf),
        }
    }
}

impl Seek for UploadFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.storage {
            PartStorage::InMemory(cursor) => cursor.seek(pos),
            PartStorage::Spilled(spill) => spill.file.seek(pos),
        }
    }
}

impl Drop for SpillFile {
    fn drop(&mut self) {
        if let Some(path) = self.temp_path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(cause = %e, path = %path.display(), "failed to remove spill file");
                }
            }
        }
    }
}

static SPILL_COUNTER: AtomicU64 = AtomicU64::new(1);

fn create_spill_file() -> io::Result<(PathBuf, File)> {
    let temp_dir = std::env::temp_dir();
    let ts_nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();

    for _ in 0..32 {
        let counter = SPILL_COUNTER.fetch_add(1, Ordering::Relaxed);
        let candidate = temp_dir.join(format!("micro-form-{}-{ts_nanos}-{counter}.part", std::process::id()));

        match OpenOptions::new().create_new(true).read(true).write(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(io::ErrorKind::AlreadyExists, "failed to allocate a unique spill file"))
}
