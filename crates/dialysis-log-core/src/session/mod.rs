//! Loaded-log session context.
//!
//! The decoder is stateless. Whatever a UI needs to remember between
//! "file opened" and "export clicked" is kept in a [`LoadedLog`], owned by a
//! [`Session`] the caller threads through presenter and exporter calls.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::ConverterConfig;
use crate::decoder;
use crate::export::{CsvDocument, CsvQuoting, ExportError, LogExport};
use crate::models::SessionRecord;
use crate::present::TableView;
use crate::source::{ByteSource, SourceError};

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("No log loaded")]
    NoLogLoaded,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A decoded log together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLog {
    /// Unique session-local ID
    pub session_id: String,
    /// Source file name
    pub file_name: String,
    /// Load timestamp
    pub loaded_at: String,
    /// Size of the source in bytes
    pub source_len: u64,
    /// Bytes dropped after the last complete record
    pub trailing_bytes: u64,
    /// SHA-256 hex digest of the source bytes
    pub source_digest: String,
    /// Decoded records in file order
    pub records: Vec<SessionRecord>,
}

/// Record counts for a loaded log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSummary {
    pub record_count: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub trailing_bytes: u64,
}

impl LoadedLog {
    /// Decode `bytes` read from a file called `file_name`.
    pub fn from_bytes(file_name: &str, bytes: &[u8], config: &ConverterConfig) -> Self {
        let records = decoder::decode_with_config(bytes, config);
        let trailing_bytes = decoder::trailing_bytes(bytes.len()) as u64;
        if trailing_bytes > 0 {
            tracing::warn!(
                file = file_name,
                trailing_bytes,
                "discarding incomplete trailing record"
            );
        }

        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            loaded_at: chrono::Utc::now().to_rfc3339(),
            source_len: bytes.len() as u64,
            trailing_bytes,
            source_digest: hash_data(bytes),
            records,
        }
    }

    /// Read and decode a whole source.
    pub fn load<S: ByteSource + ?Sized>(
        source: &mut S,
        config: &ConverterConfig,
    ) -> Result<Self, SourceError> {
        let bytes = source.read_all(config.max_source_bytes)?;
        let log = Self::from_bytes(source.name(), &bytes, config);
        tracing::info!(
            file = %log.file_name,
            records = log.records.len(),
            bytes = log.source_len,
            "loaded session log"
        );
        Ok(log)
    }

    pub fn summary(&self) -> LogSummary {
        let pass_count = self
            .records
            .iter()
            .filter(|r| r.pass_fail.is_pass())
            .count();
        LogSummary {
            record_count: self.records.len(),
            pass_count,
            fail_count: self.records.len() - pass_count,
            trailing_bytes: self.trailing_bytes,
        }
    }

    /// Render the CSV export.
    pub fn csv_document(&self, quoting: CsvQuoting) -> CsvDocument {
        CsvDocument::new(&self.file_name, &self.records, quoting)
    }

    /// Build the JSON export.
    pub fn json_export(&self) -> LogExport {
        LogExport::from_log(self)
    }

    /// Build the table view.
    pub fn table(&self) -> TableView {
        TableView::build(&self.file_name, &self.records)
    }
}

/// Holds at most one loaded log at a time.
#[derive(Debug, Default)]
pub struct Session {
    config: ConverterConfig,
    current: Option<LoadedLog>,
}

impl Session {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Load a source, replacing any previously loaded log.
    ///
    /// On failure the previous log stays loaded.
    pub fn load<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> SessionResult<&LoadedLog> {
        let log = LoadedLog::load(source, &self.config)?;
        Ok(self.current.insert(log))
    }

    /// The currently loaded log.
    pub fn current(&self) -> SessionResult<&LoadedLog> {
        self.current.as_ref().ok_or(SessionError::NoLogLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// CSV export of the current log using the configured quoting.
    pub fn export_csv(&self) -> SessionResult<CsvDocument> {
        let log = self.current()?;
        let document = log.csv_document(self.config.csv_quoting);
        tracing::info!(
            file = %document.file_name,
            records = log.records.len(),
            "exported CSV"
        );
        Ok(document)
    }

    /// JSON export of the current log.
    pub fn export_json(&self) -> SessionResult<String> {
        let json = self.current()?.json_export().to_json().map_err(ExportError::from)?;
        Ok(json)
    }

    /// Drop the current log.
    pub fn clear(&mut self) -> Option<LoadedLog> {
        self.current.take()
    }
}

/// Compute SHA-256 hash of data.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}
