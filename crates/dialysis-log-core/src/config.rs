//! Converter configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::CsvQuoting;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default upper bound on the size of a source file (64 MiB).
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 64 * 1024 * 1024;

/// Default record count at which decoding is sharded across threads.
pub const DEFAULT_PARALLEL_THRESHOLD_RECORDS: usize = 65_536;

/// Settings shared by the source, decoder and exporter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Sources larger than this are rejected before decoding
    pub max_source_bytes: u64,
    /// Minimum record count before decoding is sharded
    pub parallel_threshold_records: usize,
    /// Shard count; 0 means use the available parallelism
    pub decode_shards: usize,
    /// CSV quoting mode
    pub csv_quoting: CsvQuoting,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            parallel_threshold_records: DEFAULT_PARALLEL_THRESHOLD_RECORDS,
            decode_shards: 0,
            csv_quoting: CsvQuoting::Legacy,
        }
    }
}

impl ConverterConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_source_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_source_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Shard count to use when decoding in parallel.
    pub fn effective_shards(&self) -> usize {
        if self.decode_shards > 0 {
            self.decode_shards
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.max_source_bytes, DEFAULT_MAX_SOURCE_BYTES);
        assert_eq!(config.csv_quoting, CsvQuoting::Legacy);
        assert!(config.effective_shards() >= 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ConverterConfig::from_json_str(r#"{"csv_quoting": "minimal"}"#).unwrap();
        assert_eq!(config.csv_quoting, CsvQuoting::Minimal);
        assert_eq!(
            config.parallel_threshold_records,
            DEFAULT_PARALLEL_THRESHOLD_RECORDS
        );
    }

    #[test]
    fn test_rejects_zero_limit() {
        let result = ConverterConfig::from_json_str(r#"{"max_source_bytes": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        let result = ConverterConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"decode_shards": 4}"#).unwrap();

        let config = ConverterConfig::from_file(&path).unwrap();
        assert_eq!(config.effective_shards(), 4);
    }
}
