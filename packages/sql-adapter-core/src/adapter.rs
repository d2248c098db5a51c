//! The adapter: abstract operations in, dialect SQL out, normalized results back.

use crate::config::AdapterConfig;
use crate::dialect::Dialect;
use crate::driver::{Driver, ExecResult, ResultSet, Row};
use crate::error::AdapterError;
use crate::log::StatementLog;
use crate::query::Query;
use crate::render;
use crate::schema::TableSchema;
use crate::statement::Statement;
use crate::value::Value;

/// Result of a raw `select`.
///
/// A single projected field comes back as a flat list of scalars; anything
/// wider comes back as one [`Row`] per result row, fields in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectResult {
    /// Scalar values of the single projected field
    Column(Vec<Value>),
    /// Structured rows, one per result row
    Rows(Vec<Row>),
}

impl SelectResult {
    /// Number of result rows.
    pub fn len(&self) -> usize {
        match self {
            SelectResult::Column(values) => values.len(),
            SelectResult::Rows(rows) => rows.len(),
        }
    }

    /// Returns `true` when the result is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the scalar values, if a single field was projected.
    pub fn into_column(self) -> Option<Vec<Value>> {
        match self {
            SelectResult::Column(values) => Some(values),
            SelectResult::Rows(_) => None,
        }
    }

    /// Returns the structured rows, if more than one field was projected.
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            SelectResult::Column(_) => None,
            SelectResult::Rows(rows) => Some(rows),
        }
    }
}

/// Database adapter: renders dialect SQL, executes it through a driver,
/// and normalizes the results.
///
/// Every statement handed to the driver is recorded in the adapter's
/// [`StatementLog`] and emitted through `tracing`, in execution order.
#[derive(Debug)]
pub struct Adapter {
    name: String,
    dialect: Box<dyn Dialect>,
    driver: Box<dyn Driver>,
    config: AdapterConfig,
    log: StatementLog,
}

impl Adapter {
    /// Creates an adapter with the default configuration.
    pub fn new(
        name: impl Into<String>,
        dialect: Box<dyn Dialect>,
        driver: Box<dyn Driver>,
    ) -> Self {
        Self::with_config(name, dialect, driver, AdapterConfig::default())
    }

    /// Creates an adapter with the given configuration.
    pub fn with_config(
        name: impl Into<String>,
        dialect: Box<dyn Dialect>,
        driver: Box<dyn Driver>,
        config: AdapterConfig,
    ) -> Self {
        let log = StatementLog::new(config.statement_log_capacity);
        Self {
            name: name.into(),
            dialect,
            driver,
            config,
            log,
        }
    }

    /// Adapter name, as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The adapter's dialect.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Handle to the statement log.
    pub fn log(&self) -> &StatementLog {
        &self.log
    }

    /// Inserts a record, omitting NULL-valued columns from the statement.
    ///
    /// # Arguments
    /// * `schema` - Table written to
    /// * `record` - Column/value pairs
    ///
    /// # Returns
    /// The key generated for a serial column (via RETURNING or the
    /// driver's insert id, per dialect capability), the explicit key when
    /// one was supplied, or `None` when the table has no serial column.
    pub fn create(
        &self,
        schema: &TableSchema,
        record: &[(String, Value)],
    ) -> Result<Option<Value>, AdapterError> {
        let statement = render::render_insert(self.dialect.as_ref(), schema, record)?;

        let explicit_key = record
            .iter()
            .find(|(name, value)| {
                !value.is_null()
                    && schema
                        .column(name)
                        .map(|column| column.is_serial())
                        .unwrap_or(false)
            })
            .map(|(_, value)| value.clone());
        let generates_key = schema.serial_column().is_some() && explicit_key.is_none();

        if generates_key && self.dialect.supports_returning() {
            let result = self.run_query(&statement)?;
            return Ok(result.rows.into_iter().next().and_then(|mut row| row.pop()));
        }

        let result = self.run_execute(&statement)?;
        if let Some(key) = explicit_key {
            return Ok(Some(key));
        }
        if generates_key && self.dialect.supports_insert_id() {
            return Ok(result.insert_id.map(Value::Integer));
        }
        Ok(None)
    }

    /// Runs a raw projection query.
    ///
    /// # Returns
    /// [`SelectResult::Column`] when the statement projects one field,
    /// [`SelectResult::Rows`] otherwise. Bind arity is validated before
    /// execution.
    pub fn select(&self, sql: &str, binds: &[Value]) -> Result<SelectResult, AdapterError> {
        let statement = Statement::new(sql, binds.to_vec());
        if self.config.strict_binds {
            statement.validate()?;
        }

        let result = self.run_query(&statement)?;
        if result.columns.len() == 1 {
            let values = result
                .rows
                .into_iter()
                .map(|mut row| row.pop().unwrap_or(Value::Null))
                .collect();
            Ok(SelectResult::Column(values))
        } else {
            Ok(SelectResult::Rows(result.into_rows()))
        }
    }

    /// Runs a raw mutating statement.
    ///
    /// # Returns
    /// [`ExecResult`] with the affected-row count. The insert id is
    /// reported only on dialects that support one; elsewhere it is
    /// normalized to `None`.
    pub fn execute(&self, sql: &str, binds: &[Value]) -> Result<ExecResult, AdapterError> {
        let statement = Statement::new(sql, binds.to_vec());
        if self.config.strict_binds {
            statement.validate()?;
        }

        let mut result = self.run_execute(&statement)?;
        if !self.dialect.supports_insert_id() {
            result.insert_id = None;
        }
        Ok(result)
    }

    /// Runs a structured read.
    ///
    /// Renders the query (raising on bind mismatch before anything
    /// executes) and returns one field/value [`Row`] per result row. A
    /// deferred inclusion filter executes as a single statement carrying a
    /// subquery; a materialized one as a single statement carrying a
    /// placeholder list.
    pub fn read(&self, query: &Query) -> Result<Vec<Row>, AdapterError> {
        let statement = render::render_select(self.dialect.as_ref(), query)?;
        let result = self.run_query(&statement)?;
        Ok(result.into_rows())
    }

    /// Updates the columns in `values` on rows matched by `query`.
    ///
    /// # Returns
    /// Number of rows updated.
    pub fn update(
        &self,
        query: &Query,
        values: &[(String, Value)],
    ) -> Result<u64, AdapterError> {
        let statement = render::render_update(self.dialect.as_ref(), query, values)?;
        Ok(self.run_execute(&statement)?.affected_rows)
    }

    /// Deletes rows matched by `query`.
    ///
    /// # Returns
    /// Number of rows deleted.
    pub fn delete(&self, query: &Query) -> Result<u64, AdapterError> {
        let statement = render::render_delete(self.dialect.as_ref(), query)?;
        Ok(self.run_execute(&statement)?.affected_rows)
    }

    fn run_query(&self, statement: &Statement) -> Result<ResultSet, AdapterError> {
        self.record(statement);
        self.driver.query(statement)
    }

    fn run_execute(&self, statement: &Statement) -> Result<ExecResult, AdapterError> {
        self.record(statement);
        self.driver.execute(statement)
    }

    fn record(&self, statement: &Statement) {
        self.log.record(&statement.sql);
        tracing::debug!("{}: {}", self.name, statement.sql);
    }
}
