//! In-memory row store.
//!
//! Each table keeps its rows in an atomically swappable snapshot: readers
//! load an `Arc` to the current row vector and never block writers, which
//! serialize on a per-table mutex and publish copy-on-write snapshots.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use arc_swap::ArcSwap;

use sql_adapter_core::{AdapterError, Column, ColumnType, TableSchema, Value};

/// Snapshot of a table's rows.
pub type RowSnapshot = Arc<Vec<Arc<Vec<Value>>>>;

/// A single in-memory table.
#[derive(Debug)]
pub struct MemTable {
    /// Table name as registered
    pub name: String,
    /// Column definitions in declaration order
    pub columns: Vec<Column>,
    rows: ArcSwap<Vec<Arc<Vec<Value>>>>,
    write_lock: Mutex<()>,
    next_serial: AtomicI64,
}

impl MemTable {
    fn new(schema: &TableSchema, initial_capacity: usize) -> Self {
        Self {
            name: schema.name.clone(),
            columns: schema.columns.clone(),
            rows: ArcSwap::new(Arc::new(Vec::with_capacity(initial_capacity))),
            write_lock: Mutex::new(()),
            next_serial: AtomicI64::new(1),
        }
    }

    /// Loads the current row snapshot for lock-free read access.
    pub fn snapshot(&self) -> RowSnapshot {
        self.rows.load_full()
    }

    /// Number of rows in the current snapshot.
    pub fn row_count(&self) -> usize {
        self.rows.load().len()
    }

    /// Resolves a column name to its index, case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Index of the serial column, if the table has one.
    pub fn serial_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.is_serial())
    }

    /// Reserves the next serial value.
    pub fn assign_serial(&self) -> i64 {
        self.next_serial.fetch_add(1, Ordering::SeqCst)
    }

    /// Bumps the serial sequence past an explicitly written key.
    pub fn observe_serial(&self, value: i64) {
        self.next_serial.fetch_max(value + 1, Ordering::SeqCst);
    }

    /// Validates a fully built row and appends it.
    ///
    /// # Returns
    /// `Err(AdapterError)` when a required column is NULL or a value does
    /// not fit the column type.
    pub fn insert_row(&self, row: Vec<Value>) -> Result<(), AdapterError> {
        for (column, value) in self.columns.iter().zip(&row) {
            check_value(column, value)?;
        }

        let _guard = self.write_lock.lock().map_err(|_| AdapterError::LockPoisoned)?;
        let current = self.rows.load_full();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Arc::new(row));
        self.rows.store(Arc::new(next));
        Ok(())
    }

    /// Replaces the full row set, validating every row.
    pub fn replace_rows(&self, rows: Vec<Arc<Vec<Value>>>) -> Result<(), AdapterError> {
        for row in &rows {
            for (column, value) in self.columns.iter().zip(row.iter()) {
                check_value(column, value)?;
            }
        }

        let _guard = self.write_lock.lock().map_err(|_| AdapterError::LockPoisoned)?;
        self.rows.store(Arc::new(rows));
        Ok(())
    }
}

/// Checks a value against a column definition.
fn check_value(column: &Column, value: &Value) -> Result<(), AdapterError> {
    if value.is_null() {
        if column.required {
            return Err(AdapterError::MissingValue {
                column: column.name.clone(),
            });
        }
        return Ok(());
    }

    let fits = match column.column_type {
        ColumnType::Serial | ColumnType::Integer => matches!(value, Value::Integer(_)),
        ColumnType::Float => matches!(value, Value::Float(_) | Value::Integer(_)),
        ColumnType::Boolean => matches!(value, Value::Boolean(_)),
        ColumnType::Text => matches!(value, Value::Text(_)),
    };
    if !fits {
        return Err(AdapterError::TypeMismatch {
            expected: format!("{:?} for column '{}'", column.column_type, column.name),
            got: value.type_name().to_string(),
        });
    }
    Ok(())
}

/// Table registry for one store.
#[derive(Debug)]
pub struct MemStore {
    tables: RwLock<HashMap<String, Arc<MemTable>>>,
    initial_capacity: usize,
}

impl MemStore {
    /// Creates an empty store.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            initial_capacity,
        }
    }

    /// Registers a table from its schema.
    ///
    /// # Returns
    /// `Err(AdapterError::TableAlreadyExists)` when the name is taken
    /// (case-insensitively).
    pub fn register(&self, schema: &TableSchema) -> Result<(), AdapterError> {
        let key = schema.name.to_lowercase();
        let mut tables = self.tables.write().map_err(|_| AdapterError::LockPoisoned)?;
        if tables.contains_key(&key) {
            return Err(AdapterError::TableAlreadyExists(schema.name.clone()));
        }
        tracing::debug!(
            "registered table '{}' with {} columns",
            schema.name,
            schema.columns.len()
        );
        tables.insert(key, Arc::new(MemTable::new(schema, self.initial_capacity)));
        Ok(())
    }

    /// Looks up a table, case-insensitively.
    pub fn table(&self, name: &str) -> Result<Arc<MemTable>, AdapterError> {
        let tables = self.tables.read().map_err(|_| AdapterError::LockPoisoned)?;
        tables
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| AdapterError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Returns registered table names.
    pub fn table_names(&self) -> Vec<String> {
        match self.tables.read() {
            Ok(tables) => tables.values().map(|t| t.name.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
