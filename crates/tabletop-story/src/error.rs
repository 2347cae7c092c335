//! Custom error types for the story pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Most of the
//! pipeline degrades silently (NaN values, dropped groups, skipped marks), so
//! errors are reserved for misuse of the API: unknown columns, locked
//! navigation, unloaded data and invalid configuration.
//!
//! Errors are serializable so a frontend bridge can display them.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the story pipeline.
#[derive(Error, Debug)]
pub enum StoryError {
    /// A column name matched neither a raw label nor a camel-case alias.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A known column is missing from a loaded table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// A direct jump was requested before free navigation was unlocked.
    #[error("Cannot jump to step {requested}: free navigation is locked")]
    NavigationLocked { requested: usize },

    /// An explorer axis was assigned a column that cannot drive it.
    #[error("Column '{column}' cannot drive the {channel} channel")]
    InvalidSelection { channel: String, column: String },

    /// Rendering was requested before the tables were loaded.
    #[error("No data loaded")]
    DataNotLoaded,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The static column table does not cover the schema.
    #[error("Column table is incomplete: missing {0:?}")]
    IncompleteSchema(Vec<String>),

    /// Deriving an era table from the full table failed.
    #[error("Failed to prepare era table: {0}")]
    EraPreparationFailed(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StoryError>,
    },
}

impl StoryError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StoryError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NavigationLocked { .. } => "NAVIGATION_LOCKED",
            Self::InvalidSelection { .. } => "INVALID_SELECTION",
            Self::DataNotLoaded => "DATA_NOT_LOADED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::IncompleteSchema(_) => "INCOMPLETE_SCHEMA",
            Self::EraPreparationFailed(_) => "ERA_PREPARATION_FAILED",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the story can keep running after this error.
    ///
    /// Navigation and selection errors leave the state untouched, so the
    /// viewer can simply try another action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NavigationLocked { .. }
            | Self::InvalidSelection { .. }
            | Self::UnknownColumn(_)
            | Self::DataNotLoaded => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for StoryError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("StoryError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for StoryError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        StoryError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for story operations.
pub type Result<T> = std::result::Result<T, StoryError>;

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
        self.map_err(|e| StoryError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(StoryError::DataNotLoaded.error_code(), "DATA_NOT_LOADED");
        assert_eq!(
            StoryError::UnknownColumn("Weight".to_string()).error_code(),
            "UNKNOWN_COLUMN"
        );
        assert_eq!(
            StoryError::NavigationLocked { requested: 2 }.error_code(),
            "NAVIGATION_LOCKED"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(StoryError::NavigationLocked { requested: 1 }.is_recoverable());
        assert!(StoryError::DataNotLoaded.is_recoverable());
        assert!(!StoryError::InvalidConfig("bad".to_string()).is_recoverable());
        assert!(!StoryError::IncompleteSchema(vec!["Bin".to_string()]).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = StoryError::ColumnNotFound("Year Published".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Year Published"));
    }

    #[test]
    fn test_with_context() {
        let error = StoryError::NavigationLocked { requested: 3 }.with_context("Handling jump");
        assert!(error.to_string().contains("Handling jump"));
        assert_eq!(error.error_code(), "NAVIGATION_LOCKED");
        assert!(error.is_recoverable());
    }
}
