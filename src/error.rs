//! Custom error types for the expense tracker
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Validation and upload failures carry their own detailed types so callers
//! can show per-field messages or a single upload message.

use thiserror::Error;

use crate::services::receipt::UploadError;
use crate::services::validation::ValidationErrors;

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// One or more form fields failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Receipt upload failed or the receipt was rejected before upload
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// An identifier prefix matched more than one entity
    #[error("Ambiguous {entity_type} identifier '{identifier}' matches {matches} records")]
    Ambiguous {
        entity_type: &'static str,
        identifier: String,
        matches: usize,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl ExpenseError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an upload error
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type ExpenseResult<T> = Result<T, ExpenseError>;
