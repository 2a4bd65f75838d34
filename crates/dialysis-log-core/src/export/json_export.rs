//! JSON export with source provenance.

use serde::{Deserialize, Serialize};

use crate::models::{PassFail, SessionRecord};
use crate::session::LoadedLog;

/// Current JSON export format version.
pub const JSON_FORMAT_VERSION: &str = "1";

/// Full JSON export of one loaded log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogExport {
    /// Export metadata
    pub metadata: LogExportMetadata,
    /// Records in file order
    pub records: Vec<ExportedRecord>,
}

/// JSON export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogExportMetadata {
    /// Export format version
    pub format_version: String,
    /// Session the log was loaded in
    pub session_id: String,
    /// Name of the source file
    pub source_file: String,
    /// Size of the source in bytes
    pub source_len: u64,
    /// Bytes dropped after the last complete record
    pub trailing_bytes: u64,
    /// Hash algorithm used for the digest
    pub hash_algorithm: String,
    /// Hex digest of the source bytes
    pub source_digest: String,
    pub record_count: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    /// Load timestamp
    pub loaded_at: String,
    /// Export timestamp
    pub exported_at: String,
}

/// One record with its fields rendered the same way as in the CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedRecord {
    pub date: String,
    pub time: String,
    pub patient_id: String,
    pub patient_name: String,
    pub dialyzer_id: String,
    pub volume: i32,
    pub pass_fail: PassFail,
}

impl From<&SessionRecord> for ExportedRecord {
    fn from(record: &SessionRecord) -> Self {
        Self {
            date: record.date_string(),
            time: record.time_string(),
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            dialyzer_id: record.dialyzer_id.clone(),
            volume: record.volume,
            pass_fail: record.pass_fail,
        }
    }
}

impl LogExport {
    /// Build the export for a loaded log.
    pub fn from_log(log: &LoadedLog) -> Self {
        let summary = log.summary();
        Self {
            metadata: LogExportMetadata {
                format_version: JSON_FORMAT_VERSION.to_string(),
                session_id: log.session_id.clone(),
                source_file: log.file_name.clone(),
                source_len: log.source_len,
                trailing_bytes: log.trailing_bytes,
                hash_algorithm: "SHA-256".to_string(),
                source_digest: log.source_digest.clone(),
                record_count: summary.record_count,
                pass_count: summary.pass_count,
                fail_count: summary.fail_count,
                loaded_at: log.loaded_at.clone(),
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            records: log.records.iter().map(ExportedRecord::from).collect(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
