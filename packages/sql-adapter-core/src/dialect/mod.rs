//! Backend-specific SQL syntax variants.
//!
//! Each dialect controls identifier quoting, default-value INSERT shapes,
//! RETURNING support, insert-id semantics, and row-limit clauses. The
//! renderer asks the dialect for syntax; it never branches on backend names.

use std::fmt;

use crate::schema::{Column, TableSchema};

mod ansi;
mod mysql;
mod oracle;
mod postgres;
mod sqlserver;

pub use ansi::Ansi;
pub use mysql::Mysql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlserver::SqlServer;

/// Backend-specific SQL syntax.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Dialect name as used in connection options.
    fn name(&self) -> &'static str;

    /// Quotes an identifier for this backend.
    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Whether an INSERT may omit every column.
    fn supports_default_values(&self) -> bool {
        true
    }

    /// Whether INSERT supports a RETURNING clause for generated keys.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Whether the backend reports generated keys through an insert id.
    fn supports_insert_id(&self) -> bool {
        false
    }

    /// INSERT body when every column is left to its default.
    fn default_values_clause(&self, schema: &TableSchema) -> String {
        let _ = schema;
        if self.supports_default_values() {
            "DEFAULT VALUES".to_string()
        } else {
            "() VALUES ()".to_string()
        }
    }

    /// RETURNING clause fetching a generated key, where supported.
    fn returning_clause(&self, key: &Column) -> Option<String> {
        if self.supports_returning() {
            Some(format!("RETURNING {}", self.quote_identifier(&key.name)))
        } else {
            None
        }
    }

    /// Wraps an INSERT that writes an explicit value into a serial column.
    fn wrap_serial_insert(&self, schema: &TableSchema, statement: String) -> String {
        let _ = schema;
        statement
    }

    /// Row-limit clause for the given limit and offset.
    fn limit_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(format!("LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => Some(format!("LIMIT {}", limit)),
            (None, Some(offset)) => Some(format!("OFFSET {}", offset)),
            (None, None) => None,
        }
    }
}

/// Constructs a dialect by name.
///
/// # Arguments
/// * `name` - Dialect name, case-insensitive ("ansi", "mysql", "postgres",
///   "sqlserver", "oracle", plus common aliases)
///
/// # Returns
/// `Some(Box<dyn Dialect>)` if the name is known, `None` otherwise.
pub fn dialect_for(name: &str) -> Option<Box<dyn Dialect>> {
    match name.to_ascii_lowercase().as_str() {
        "ansi" | "generic" | "sql" => Some(Box::new(Ansi)),
        "mysql" => Some(Box::new(Mysql)),
        "postgres" | "postgresql" => Some(Box::new(Postgres)),
        "sqlserver" | "mssql" => Some(Box::new(SqlServer)),
        "oracle" => Some(Box::new(Oracle)),
        _ => None,
    }
}
