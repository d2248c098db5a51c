//! Adapter error types.

use thiserror::Error;

/// Adapter operation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// Placeholder count does not match supplied bind values
    #[error("Binding mismatch: {supplied} for {expected}")]
    BindMismatch { expected: usize, supplied: usize },

    /// Table not found
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Column not found in table
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Relation not found on table
    #[error("Relation '{relation}' not found on table '{table}'")]
    RelationNotFound { table: String, relation: String },

    /// Type mismatch error
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Required column was given no value
    #[error("Required column '{column}' has no value")]
    MissingValue { column: String },

    /// Statement could not be parsed
    #[error("Syntax error: {message}")]
    Syntax { message: String },

    /// Operation not supported by this dialect or backend
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl AdapterError {
    /// Shorthand for a syntax error with a formatted message.
    pub fn syntax(message: impl Into<String>) -> Self {
        AdapterError::Syntax {
            message: message.into(),
        }
    }
}
