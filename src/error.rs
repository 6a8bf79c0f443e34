//! Error types for the taskboard backend.
//!
//! The typed repository layer returns raw `sqlx::Error` and signals absence
//! with `Option`/`bool` rather than an error. [`TaskboardError`] is the
//! service-level taxonomy: absence becomes `TaskNotFound` there and nowhere
//! else, so a store failure can never masquerade as a missing record.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskboardError {
    #[error("task {0} not found")]
    TaskNotFound(i64),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),

    /// A raw statement or procedural block failed. The transaction has been
    /// rolled back; the underlying store error is logged under the operation
    /// name but never carried in this variant.
    #[error("native query '{operation}' failed")]
    NativeExecution { operation: String },
}

impl From<sqlx::Error> for TaskboardError {
    fn from(err: sqlx::Error) -> Self {
        TaskboardError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskboardError>;
