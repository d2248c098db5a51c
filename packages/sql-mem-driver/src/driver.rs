//! Driver implementation: parse, execute, normalize.

use std::sync::Arc;

use sql_adapter_core::{
    AdapterError, Driver, ExecResult, ResultSet, Statement, TableSchema,
};

use crate::ast::SqlStatement;
use crate::eval::Executor;
use crate::parser::parse;
use crate::store::MemStore;

/// In-memory backend speaking the driver contract.
///
/// Statements are parsed per call and evaluated against the shared store;
/// tables are registered up front from their schemas.
#[derive(Debug, Clone)]
pub struct MemoryDriver {
    store: Arc<MemStore>,
}

impl MemoryDriver {
    /// Creates a driver over an empty store.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a driver whose tables preallocate `initial_capacity` rows.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            store: Arc::new(MemStore::new(initial_capacity)),
        }
    }

    /// Creates a driver with the given tables registered.
    pub fn with_schemas(schemas: &[TableSchema]) -> Result<Self, AdapterError> {
        let driver = Self::new();
        for schema in schemas {
            driver.register(schema)?;
        }
        Ok(driver)
    }

    /// Registers a table.
    pub fn register(&self, schema: &TableSchema) -> Result<(), AdapterError> {
        self.store.register(schema)
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<MemStore> {
        Arc::clone(&self.store)
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for MemoryDriver {
    fn query(&self, statement: &Statement) -> Result<ResultSet, AdapterError> {
        let parsed = parse(&statement.sql)?;
        let executor = Executor::new(&self.store, &statement.binds);
        match parsed {
            SqlStatement::Select(stmt) => executor.run_select(&stmt),
            SqlStatement::Insert(stmt) => {
                let (_, returning) = executor.run_insert(&stmt)?;
                returning.ok_or(AdapterError::Unsupported(
                    "statement produces no rows",
                ))
            }
            SqlStatement::Update(_) | SqlStatement::Delete(_) => {
                Err(AdapterError::Unsupported("statement produces no rows"))
            }
        }
    }

    fn execute(&self, statement: &Statement) -> Result<ExecResult, AdapterError> {
        let parsed = parse(&statement.sql)?;
        let executor = Executor::new(&self.store, &statement.binds);
        match parsed {
            SqlStatement::Insert(stmt) => Ok(executor.run_insert(&stmt)?.0),
            SqlStatement::Update(stmt) => executor.run_update(&stmt),
            SqlStatement::Delete(stmt) => executor.run_delete(&stmt),
            SqlStatement::Select(_) => {
                Err(AdapterError::Unsupported("SELECT through execute"))
            }
        }
    }
}
