//! Byte sources that feed the decoder.
//!
//! The decoder only ever sees a finished `&[u8]`; acquiring that buffer, and
//! everything that can go wrong while doing so, lives here.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while acquiring a source buffer.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source is {actual} bytes, larger than the {limit} byte limit")]
    TooLarge { limit: u64, actual: u64 },
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Something that can hand over the raw bytes of one log.
pub trait ByteSource {
    /// Display name of the source, usually the file name.
    fn name(&self) -> &str;

    /// Read the whole source, refusing anything larger than `limit` bytes.
    fn read_all(&mut self, limit: u64) -> SourceResult<Vec<u8>>;
}

/// A log file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&mut self, limit: u64) -> SourceResult<Vec<u8>> {
        let file = File::open(&self.path)?;
        let declared = file.metadata()?.len();
        if declared > limit {
            return Err(SourceError::TooLarge {
                limit,
                actual: declared,
            });
        }

        // The file may grow between stat and read; cap the read as well.
        let mut buffer = Vec::with_capacity(declared as usize);
        file.take(limit.saturating_add(1)).read_to_end(&mut buffer)?;
        let actual = buffer.len() as u64;
        if actual > limit {
            return Err(SourceError::TooLarge { limit, actual });
        }

        tracing::debug!(path = %self.path.display(), bytes = actual, "read source file");
        Ok(buffer)
    }
}

/// An in-memory buffer, e.g. bytes handed over by a UI layer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&mut self, limit: u64) -> SourceResult<Vec<u8>> {
        let actual = self.bytes.len() as u64;
        if actual > limit {
            return Err(SourceError::TooLarge { limit, actual });
        }
        Ok(self.bytes.clone())
    }
}
