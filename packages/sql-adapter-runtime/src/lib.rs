//! Named adapter registry and connection options.
//!
//! Mirrors the `setup(name, options)` entry point of the adapter layer:
//! a connection URL selects the driver and dialect, and adapters are
//! registered and fetched by name.

pub mod error;
pub mod options;
pub mod registry;

pub use error::RuntimeError;
pub use options::ConnectionOptions;
pub use registry::AdapterRegistry;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
