//! Driver contract and normalized result shapes.

use std::fmt;

use crate::error::AdapterError;
use crate::statement::Statement;
use crate::value::Value;

/// Rows returned by a driver, with columns in projection order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    /// Column names in projection order
    pub columns: Vec<String>,
    /// Row values, one `Vec<Value>` per row in column order
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Creates a result set.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no rows were produced.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts into field/value rows, pairing each value with its column.
    pub fn into_rows(self) -> Vec<Row> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| {
                Row::new(
                    columns
                        .iter()
                        .cloned()
                        .zip(values)
                        .collect::<Vec<(String, Value)>>(),
                )
            })
            .collect()
    }
}

/// One result row: field/value pairs in projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Creates a row from field/value pairs.
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Looks up a value by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Field/value pairs in projection order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Values in projection order.
    pub fn values(&self) -> Vec<&Value> {
        self.fields.iter().map(|(_, value)| value).collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of a non-query statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Number of rows the statement affected
    pub affected_rows: u64,
    /// Serial key assigned by the statement, if any
    pub insert_id: Option<i64>,
}

/// Backend connection executing rendered statements.
///
/// Drivers receive complete [`Statement`]s and normalize whatever their
/// wire format produces into [`ResultSet`] / [`ExecResult`]. Dialect
/// concerns stay out of this trait; the adapter owns them.
pub trait Driver: fmt::Debug + Send + Sync {
    /// Executes a statement expected to produce rows.
    fn query(&self, statement: &Statement) -> Result<ResultSet, AdapterError>;

    /// Executes a statement expected to mutate data.
    fn execute(&self, statement: &Statement) -> Result<ExecResult, AdapterError>;
}
