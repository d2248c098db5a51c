//! Runtime error types.

use thiserror::Error;

use sql_adapter_core::AdapterError;

/// Registry and connection-setup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Connection URL could not be parsed
    #[error("Invalid connection URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No driver registered for the URL scheme
    #[error("Unknown connection scheme '{0}'")]
    UnknownScheme(String),

    /// No dialect with the given name
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),

    /// Adapter name already registered
    #[error("Adapter '{0}' is already set up")]
    AdapterExists(String),

    /// Adapter name not registered
    #[error("Adapter '{0}' is not set up")]
    AdapterNotFound(String),

    /// Error from the adapter layer
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
