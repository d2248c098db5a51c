//! Adapter configuration.

/// Adapter configuration.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Initial table capacity in rows, for backends that preallocate
    pub initial_table_capacity: usize,
    /// Maximum number of statements kept in the statement log
    pub statement_log_capacity: usize,
    /// Validate bind arity of raw statements before execution
    pub strict_binds: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            initial_table_capacity: 1024,
            statement_log_capacity: 256,
            strict_binds: true,
        }
    }
}
