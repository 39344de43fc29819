//! Error types for input validation, loading, export and the advisory service

use thiserror::Error;

/// A scenario input outside its documented domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl InputError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        InputError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            InputError::InvalidInput { field, .. } => field,
        }
    }
}

/// Failure reading scenarios from CSV or JSON
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure writing the projection table
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure of the advisory collaborator; never fatal to a projection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisoryError {
    #[error("advisory service unavailable: {0}")]
    Unavailable(String),
    #[error("question is empty")]
    EmptyQuestion,
}

pub type InputResult<T> = Result<T, InputError>;
pub type LoadResult<T> = Result<T, LoadError>;
pub type ExportResult<T> = Result<T, ExportError>;
