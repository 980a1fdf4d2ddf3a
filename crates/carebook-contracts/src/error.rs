//! Error types shared by every Carebook crate.
//!
//! All fallible operations return `CarebookResult<T>`. Variants carry enough
//! context for the HTTP layer to pick a status code and a readable message.

use thiserror::Error;

use crate::validate::FieldViolation;

/// The unified error type for the Carebook service.
#[derive(Debug, Error)]
pub enum CarebookError {
    /// The payload failed structural or semantic validation.
    #[error("validation failed: {}", summarize(.failures))]
    Validation { failures: Vec<FieldViolation> },

    /// No patient record exists under the requested id.
    #[error("patient '{id}' does not exist")]
    NotFound { id: String },

    /// A patient record already exists under the id being created.
    #[error("patient '{id}' already exists")]
    Conflict { id: String },

    /// A query parameter or request body could not be accepted.
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    /// The backing store could not be read or written.
    ///
    /// Never retried; the caller sees the failure immediately.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// The classifier artifact is unusable or inference failed.
    #[error("model error: {reason}")]
    Model { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Internal coordination failed (poisoned lock, aborted worker).
    #[error("internal state error: {reason}")]
    StateError { reason: String },
}

impl CarebookError {
    /// Shorthand for a validation error carrying a single violation.
    pub fn invalid(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            failures: vec![FieldViolation::new(field, constraint)],
        }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::BadRequest { .. }
        )
    }
}

fn summarize(failures: &[FieldViolation]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias used throughout the Carebook crates.
pub type CarebookResult<T> = Result<T, CarebookError>;
