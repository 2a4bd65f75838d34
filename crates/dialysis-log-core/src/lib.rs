//! Dialysis-Log Core Library
//!
//! Decodes the fixed-width binary session logs written by dialysis machines
//! and converts them to CSV.
//!
//! # Architecture
//!
//! ```text
//!   ByteSource (file / memory)
//!            │
//!            ▼
//!   ┌─────────────────────────┐
//!   │     RecordDecoder       │   88-byte records, positional, total
//!   │  bytes → SessionRecord  │
//!   └────────────┬────────────┘
//!                │
//!        [SESSION: LoadedLog]
//!                │
//!        ┌───────┴────────┐
//!        ▼                ▼
//!    Presenter         Exporter
//!   (table view)     (CSV / JSON)
//! ```
//!
//! # Core Principle
//!
//! **Decoding never fails.** Every byte pattern maps to some record; the only
//! errors come from reading the source.
//!
//! # Modules
//!
//! - [`decoder`]: Binary record decoder
//! - [`models`]: Domain types (SessionRecord, SessionDate, PassFail, etc.)
//! - [`source`]: Byte sources (file, memory)
//! - [`session`]: Loaded-log context replacing global state
//! - [`present`]: Table view model
//! - [`export`]: CSV and JSON export
//! - [`config`]: Converter configuration

pub mod config;
pub mod decoder;
pub mod export;
pub mod models;
pub mod present;
pub mod session;
pub mod source;

// Re-export commonly used types
pub use config::ConverterConfig;
pub use decoder::{decode, decode_sharded, records, RECORD_SIZE};
pub use export::{csv_file_name, parse_csv, to_csv, CsvDocument, CsvQuoting, LogExport};
pub use models::{PassFail, SessionDate, SessionRecord, SessionTime};
pub use present::{PassFailBadge, TableView};
pub use session::{LoadedLog, LogSummary, Session};
pub use source::{ByteSource, FileSource, MemorySource};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DialysisLogError {
    #[error("Could not read source: {0}")]
    SourceError(String),

    #[error("No log loaded: {0}")]
    NoLogLoaded(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<source::SourceError> for DialysisLogError {
    fn from(e: source::SourceError) -> Self {
        DialysisLogError::SourceError(e.to_string())
    }
}

impl From<session::SessionError> for DialysisLogError {
    fn from(e: session::SessionError) -> Self {
        match e {
            session::SessionError::Source(e) => e.into(),
            session::SessionError::Export(e) => e.into(),
            session::SessionError::NoLogLoaded => {
                DialysisLogError::NoLogLoaded("open a log file first".to_string())
            }
        }
    }
}

impl From<export::ExportError> for DialysisLogError {
    fn from(e: export::ExportError) -> Self {
        DialysisLogError::ExportError(e.to_string())
    }
}

impl From<config::ConfigError> for DialysisLogError {
    fn from(e: config::ConfigError) -> Self {
        DialysisLogError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DialysisLogError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DialysisLogError::InternalError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a session with default configuration.
#[uniffi::export]
pub fn open_session() -> Arc<DialysisLogCore> {
    Arc::new(DialysisLogCore::with_session(Session::default()))
}

/// Create a session from a JSON configuration document.
#[uniffi::export]
pub fn open_session_with_config(
    config_json: String,
) -> Result<Arc<DialysisLogCore>, DialysisLogError> {
    let config = ConverterConfig::from_json_str(&config_json)?;
    Ok(Arc::new(DialysisLogCore::with_session(Session::new(config))))
}

/// Decode a buffer without keeping any session state.
#[uniffi::export]
pub fn decode_log_bytes(bytes: Vec<u8>) -> Vec<FfiSessionRecord> {
    decoder::records(&bytes).map(FfiSessionRecord::from).collect()
}

/// Name of the CSV file exported for `input_name`.
#[uniffi::export]
pub fn converted_file_name(input_name: String) -> String {
    csv_file_name(&input_name)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DialysisLogCore {
    session: Arc<Mutex<Session>>,
}

impl DialysisLogCore {
    fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

#[uniffi::export]
impl DialysisLogCore {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Decode bytes handed over by the UI, replacing the loaded log.
    pub fn load_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<FfiLogSummary, DialysisLogError> {
        let mut session = self.session.lock()?;
        let mut source = MemorySource::new(file_name, bytes);
        let log = session.load(&mut source)?;
        Ok(log.into())
    }

    /// Read and decode a file, replacing the loaded log.
    pub fn load_file(&self, path: String) -> Result<FfiLogSummary, DialysisLogError> {
        let mut session = self.session.lock()?;
        let mut source = FileSource::new(&path);
        let log = session.load(&mut source)?;
        Ok(log.into())
    }

    /// Drop the loaded log.
    pub fn clear(&self) -> Result<bool, DialysisLogError> {
        let mut session = self.session.lock()?;
        Ok(session.clear().is_some())
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Summary of the loaded log.
    pub fn summary(&self) -> Result<FfiLogSummary, DialysisLogError> {
        let session = self.session.lock()?;
        Ok(session.current()?.into())
    }

    /// Records of the loaded log, in file order.
    pub fn records(&self) -> Result<Vec<FfiSessionRecord>, DialysisLogError> {
        let session = self.session.lock()?;
        let log = session.current()?;
        Ok(log.records.iter().cloned().map(FfiSessionRecord::from).collect())
    }

    /// Table rows of the loaded log.
    pub fn table(&self) -> Result<Vec<FfiTableRow>, DialysisLogError> {
        let session = self.session.lock()?;
        let table = session.current()?.table();
        Ok(table.rows.into_iter().map(FfiTableRow::from).collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Suggested CSV file name for the loaded log.
    pub fn csv_file_name(&self) -> Result<String, DialysisLogError> {
        let session = self.session.lock()?;
        Ok(csv_file_name(&session.current()?.file_name))
    }

    /// Export the loaded log as CSV.
    pub fn export_csv(&self) -> Result<String, DialysisLogError> {
        let session = self.session.lock()?;
        Ok(session.export_csv()?.contents)
    }

    /// Export the loaded log as JSON.
    pub fn export_json(&self) -> Result<String, DialysisLogError> {
        let session = self.session.lock()?;
        Ok(session.export_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe session record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSessionRecord {
    pub date: String,
    pub time: String,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub patient_id: String,
    pub patient_name: String,
    pub dialyzer_id: String,
    pub volume: i32,
    pub passed: bool,
}

impl From<SessionRecord> for FfiSessionRecord {
    fn from(record: SessionRecord) -> Self {
        Self {
            date: record.date_string(),
            time: record.time_string(),
            year: record.date.year,
            month: record.date.month,
            day: record.date.day,
            hour: record.time.hour,
            minute: record.time.minute,
            patient_id: record.patient_id,
            patient_name: record.patient_name,
            dialyzer_id: record.dialyzer_id,
            volume: record.volume,
            passed: record.pass_fail.is_pass(),
        }
    }
}

/// FFI-safe table row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTableRow {
    pub index: u64,
    pub cells: Vec<String>,
    pub passed: bool,
}

impl From<present::TableRow> for FfiTableRow {
    fn from(row: present::TableRow) -> Self {
        Self {
            index: row.index as u64,
            passed: row.badge == PassFailBadge::Pass,
            cells: vec![
                row.date,
                row.time,
                row.patient_id,
                row.patient_name,
                row.dialyzer_id,
                row.volume,
                row.badge.symbol().to_string(),
            ],
        }
    }
}

/// FFI-safe log summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLogSummary {
    pub session_id: String,
    pub file_name: String,
    pub loaded_at: String,
    pub source_digest: String,
    pub record_count: u64,
    pub pass_count: u64,
    pub fail_count: u64,
    pub trailing_bytes: u64,
}

impl From<&LoadedLog> for FfiLogSummary {
    fn from(log: &LoadedLog) -> Self {
        let summary = log.summary();
        Self {
            session_id: log.session_id.clone(),
            file_name: log.file_name.clone(),
            loaded_at: log.loaded_at.clone(),
            source_digest: log.source_digest.clone(),
            record_count: summary.record_count as u64,
            pass_count: summary.pass_count as u64,
            fail_count: summary.fail_count as u64,
            trailing_bytes: summary.trailing_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass_record_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; RECORD_SIZE];
        bytes[2..4].copy_from_slice(&2024u16.to_le_bytes());
        bytes[64] = 0xFF;
        bytes
    }

    #[test]
    fn test_decode_log_bytes() {
        let records = decode_log_bytes(pass_record_bytes());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2024);
        assert_eq!(records[0].date, "2024-00-00");
        assert!(records[0].passed);
    }

    #[test]
    fn test_core_requires_loaded_log() {
        let core = open_session();
        assert!(matches!(
            core.export_csv(),
            Err(DialysisLogError::NoLogLoaded(_))
        ));
    }

    #[test]
    fn test_core_load_and_export() {
        let core = open_session();
        let summary = core
            .load_bytes("unit7.dat".to_string(), pass_record_bytes())
            .unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.pass_count, 1);

        assert_eq!(core.csv_file_name().unwrap(), "unit7_converted.csv");
        assert!(core.export_csv().unwrap().ends_with(",0,true"));

        let rows = core.table().unwrap();
        assert_eq!(rows[0].cells[6], "PASS");
        assert!(rows[0].passed);

        assert!(core.clear().unwrap());
        assert!(!core.clear().unwrap());
    }

    #[test]
    fn test_core_with_invalid_config() {
        let result = open_session_with_config(r#"{"max_source_bytes": 0}"#.to_string());
        assert!(matches!(result, Err(DialysisLogError::ConfigError(_))));
    }

    #[test]
    fn test_core_source_too_large() {
        let core =
            open_session_with_config(r#"{"max_source_bytes": 10}"#.to_string()).unwrap();
        let result = core.load_bytes("big.dat".to_string(), vec![0u8; 11]);
        assert!(matches!(result, Err(DialysisLogError::SourceError(_))));
    }
}
