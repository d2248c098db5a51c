//! Dialect-aware SQL adapter layer for relational backends.
//!
//! Provides the value model, table schema descriptors, abstract queries,
//! per-backend SQL dialects, statement rendering with bind validation,
//! and the adapter that executes rendered statements through a driver
//! and normalizes the results.

pub mod adapter;
pub mod config;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod log;
pub mod query;
pub mod render;
pub mod schema;
pub mod statement;
pub mod value;

pub use adapter::{Adapter, SelectResult};
pub use config::AdapterConfig;
pub use dialect::{dialect_for, Ansi, Dialect, Mysql, Oracle, Postgres, SqlServer};
pub use driver::{Driver, ExecResult, ResultSet, Row};
pub use error::AdapterError;
pub use log::StatementLog;
pub use query::{Condition, Direction, InValues, Order, Query};
pub use schema::{Column, ColumnType, Relation, TableSchema};
pub use statement::Statement;
pub use value::Value;
