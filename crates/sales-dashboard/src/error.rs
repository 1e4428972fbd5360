//! Error types for the sales dashboard core.
//!
//! Every failure that reaches the presentation layer is a [`DashboardError`].
//! Errors serialize as `{ code, message }` so a front end can render the
//! message and branch on the code without parsing text.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for loading, filtering and reporting.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No alias matched for one or more required fields.
    ///
    /// `fields` holds the user-facing labels, e.g. `"Sales / Total / Revenue"`.
    #[error("Missing required columns: {}. Please check your dataset.", .fields.join(", "))]
    MissingRequiredColumn { fields: Vec<String> },

    /// A canonical column was expected but is not in the frame.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Date range with `start` after `end`.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// The source file could not be located or inspected.
    #[error("Source file '{path}' is unavailable: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredColumn { .. } => "MISSING_REQUIRED_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error halts rendering for the rest of the session.
    ///
    /// A blocking error means no partial dashboard may be shown. Only a bad
    /// filter selection is something the user can fix in place.
    pub fn is_blocking(&self) -> bool {
        match self {
            Self::InvalidDateRange { .. } => false,
            Self::WithContext { source, .. } => source.is_blocking(),
            _ => true,
        }
    }

    /// Labels of the missing required fields, if this is a schema failure.
    pub fn missing_fields(&self) -> Option<&[String]> {
        match self {
            Self::MissingRequiredColumn { fields } => Some(fields.as_slice()),
            Self::WithContext { source, .. } => source.missing_fields(),
            _ => None,
        }
    }
}

impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_sales() -> DashboardError {
        DashboardError::MissingRequiredColumn {
            fields: vec!["Sales / Total / Revenue".to_string()],
        }
    }

    #[test]
    fn test_missing_column_message() {
        let error = DashboardError::MissingRequiredColumn {
            fields: vec![
                "Order Date".to_string(),
                "Sales / Total / Revenue".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Missing required columns: Order Date, Sales / Total / Revenue. Please check your dataset."
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(missing_sales().error_code(), "MISSING_REQUIRED_COLUMN");
        assert_eq!(
            DashboardError::ColumnNotFound("Sales".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_blocking() {
        assert!(missing_sales().is_blocking());
        let range = DashboardError::InvalidDateRange {
            start: "2024-02-01".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert!(!range.is_blocking());
        assert!(!range.with_context("Applying filter").is_blocking());
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_string(&missing_sales()).unwrap();
        assert!(json.contains("MISSING_REQUIRED_COLUMN"));
        assert!(json.contains("Sales / Total / Revenue"));
    }

    #[test]
    fn test_with_context_preserves_code_and_fields() {
        let error = missing_sales().with_context("Loading data/sales.csv");
        assert!(error.to_string().starts_with("Loading data/sales.csv"));
        assert_eq!(error.error_code(), "MISSING_REQUIRED_COLUMN");
        assert_eq!(
            error.missing_fields(),
            Some(&["Sales / Total / Revenue".to_string()][..])
        );
    }
}
