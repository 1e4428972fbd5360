//! Configuration for a dashboard session.
//!
//! This module provides [`DashboardConfig`] and its builder. A config can also
//! be read from a JSON file so the same settings can be shared between runs.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of rows shown in the top products chart unless overridden.
pub const DEFAULT_TOP_N: usize = 10;

/// Rows sampled by the CSV reader to infer column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 100;

/// Configuration for loading and reporting.
///
/// Use [`DashboardConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sales_dashboard::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .source_path("data/sales_data.csv")
///     .top_n(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file holding the sales records.
    /// Default: "data/sales_data.csv"
    pub source_path: PathBuf,

    /// Maximum number of products in the top products aggregate.
    /// Default: 10
    pub top_n: usize,

    /// Number of rows the CSV reader inspects to infer column types.
    /// Default: 100
    pub infer_schema_length: usize,

    /// Field separator of the source file.
    /// Default: ','
    pub separator: char,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("data/sales_data.csv"),
            top_n: DEFAULT_TOP_N,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            separator: ',',
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Read a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| DashboardError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::InvalidSchemaLength(
                self.infer_schema_length,
            ));
        }

        if !self.separator.is_ascii() || self.separator == '"' || self.separator == '\n' {
            return Err(ConfigValidationError::InvalidSeparator(self.separator));
        }

        Ok(())
    }

    /// The separator as the byte the CSV reader expects.
    pub fn separator_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.separator as u8
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Invalid infer_schema_length: {0} (must be at least 1)")]
    InvalidSchemaLength(usize),

    #[error("Invalid separator {0:?} (must be a single ASCII character other than a quote or newline)")]
    InvalidSeparator(char),
}

impl From<ConfigValidationError> for DashboardError {
    fn from(err: ConfigValidationError) -> Self {
        DashboardError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    source_path: Option<PathBuf>,
    top_n: Option<usize>,
    infer_schema_length: Option<usize>,
    separator: Option<char>,
}

impl DashboardConfigBuilder {
    /// Start from an existing configuration, e.g. one read from a file.
    pub fn from_config(config: DashboardConfig) -> Self {
        Self {
            source_path: Some(config.source_path),
            top_n: Some(config.top_n),
            infer_schema_length: Some(config.infer_schema_length),
            separator: Some(config.separator),
        }
    }

    /// Set the CSV file to load.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Set how many products the top products aggregate keeps.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set how many rows are used for CSV schema inference.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the field separator of the source file.
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            source_path: self.source_path.unwrap_or(defaults.source_path),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            separator: self.separator.unwrap_or(defaults.separator),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.source_path, PathBuf::from("data/sales_data.csv"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.infer_schema_length, 100);
        assert_eq!(config.separator, ',');
    }

    #[test]
    fn test_builder_custom_values() {
        let config = DashboardConfig::builder()
            .source_path("orders.tsv")
            .top_n(3)
            .separator('\t')
            .build()
            .unwrap();

        assert_eq!(config.source_path, PathBuf::from("orders.tsv"));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.separator_byte(), b'\t');
    }

    #[test]
    fn test_validation_invalid_top_n() {
        let result = DashboardConfig::builder().top_n(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTopN(0)
        ));
    }

    #[test]
    fn test_validation_invalid_separator() {
        let result = DashboardConfig::builder().separator('€').build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSeparator('€')
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "source_path": "exports/q1.csv", "top_n": 5 }"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.source_path, PathBuf::from("exports/q1.csv"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.separator, ',');
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 0 }}"#).unwrap();

        let err = DashboardConfig::from_json_file(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
