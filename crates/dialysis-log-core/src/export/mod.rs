//! CSV and JSON export of decoded session logs.

mod csv_export;
mod json_export;

pub use csv_export::*;
pub use json_export::*;

use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing CSV column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} for column {column} on line {line}")]
    InvalidField {
        line: usize,
        column: String,
        value: String,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;
