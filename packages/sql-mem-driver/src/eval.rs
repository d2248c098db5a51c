//! Statement execution against the row store.
//!
//! WHERE evaluation uses SQL three-valued logic: comparisons and IN
//! predicates involving NULL yield unknown, and only rows whose filter is
//! definitely true survive.

use std::cmp::Ordering;
use std::sync::Arc;

use sql_adapter_core::{AdapterError, ExecResult, ResultSet, Value};

use crate::ast::{
    BinaryOp, ColumnRef, DeleteStmt, Expr, InList, InsertBody, InsertStmt, SelectStmt, UpdateStmt,
};
use crate::store::{MemStore, MemTable};

/// Executes parsed statements with a fixed set of binds.
pub struct Executor<'a> {
    store: &'a MemStore,
    binds: &'a [Value],
}

/// Resolution scope: the tables joined into the current row combination.
struct Scope<'a> {
    tables: &'a [Arc<MemTable>],
    rows: &'a [Arc<Vec<Value>>],
}

impl Scope<'_> {
    fn resolve_index(&self, reference: &ColumnRef) -> Result<(usize, usize), AdapterError> {
        match &reference.table {
            Some(table) => {
                let table_index = self
                    .tables
                    .iter()
                    .position(|t| t.name.eq_ignore_ascii_case(table))
                    .ok_or_else(|| AdapterError::TableNotFound {
                        table: table.clone(),
                    })?;
                let column_index = self.tables[table_index]
                    .column_index(&reference.column)
                    .ok_or_else(|| AdapterError::ColumnNotFound {
                        table: self.tables[table_index].name.clone(),
                        column: reference.column.clone(),
                    })?;
                Ok((table_index, column_index))
            }
            None => {
                for (table_index, table) in self.tables.iter().enumerate() {
                    if let Some(column_index) = table.column_index(&reference.column) {
                        return Ok((table_index, column_index));
                    }
                }
                Err(AdapterError::ColumnNotFound {
                    table: self.tables[0].name.clone(),
                    column: reference.column.clone(),
                })
            }
        }
    }

    fn value(&self, reference: &ColumnRef) -> Result<Value, AdapterError> {
        let (table_index, column_index) = self.resolve_index(reference)?;
        Ok(self.rows[table_index][column_index].clone())
    }
}

impl<'a> Executor<'a> {
    /// Creates an executor over a store with the statement's binds.
    pub fn new(store: &'a MemStore, binds: &'a [Value]) -> Self {
        Self { store, binds }
    }

    /// Runs a SELECT, producing columns in projection order.
    pub fn run_select(&self, stmt: &SelectStmt) -> Result<ResultSet, AdapterError> {
        let base = self.store.table(&stmt.table)?;
        let mut tables = vec![base.clone()];

        // Row combinations, starting with the base table's snapshot
        let mut contexts: Vec<Vec<Arc<Vec<Value>>>> = base
            .snapshot()
            .iter()
            .map(|row| vec![row.clone()])
            .collect();

        for join in &stmt.joins {
            let join_table = self.store.table(&join.table)?;
            let join_rows = join_table.snapshot();
            tables.push(join_table);

            let mut joined = Vec::new();
            for context in &contexts {
                for row in join_rows.iter() {
                    let mut candidate = context.clone();
                    candidate.push(row.clone());
                    let scope = Scope {
                        tables: &tables,
                        rows: &candidate,
                    };
                    let left = scope.value(&join.left)?;
                    let right = scope.value(&join.right)?;
                    if truth(&compare(BinaryOp::Eq, left, right)?) {
                        joined.push(candidate);
                    }
                }
            }
            contexts = joined;
        }

        let mut matched = Vec::new();
        for context in contexts {
            let keep = match &stmt.filter {
                Some(filter) => {
                    let scope = Scope {
                        tables: &tables,
                        rows: &context,
                    };
                    truth(&self.eval(filter, &scope)?)
                }
                None => true,
            };
            if keep {
                matched.push(context);
            }
        }

        if !stmt.order.is_empty() {
            let mut keyed = Vec::with_capacity(matched.len());
            for context in matched {
                let scope = Scope {
                    tables: &tables,
                    rows: &context,
                };
                let mut keys = Vec::with_capacity(stmt.order.len());
                for order in &stmt.order {
                    keys.push(scope.value(&order.column)?);
                }
                keyed.push((keys, context));
            }
            keyed.sort_by(|(a, _), (b, _)| {
                for (index, order) in stmt.order.iter().enumerate() {
                    let ordering = sort_compare(&a[index], &b[index]);
                    let ordering = if order.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
            matched = keyed.into_iter().map(|(_, context)| context).collect();
        }

        let offset = stmt.offset.unwrap_or(0) as usize;
        let limit = stmt.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let window: Vec<_> = matched.into_iter().skip(offset).take(limit).collect();

        // Resolve the projection to canonical column names and indices
        let mut columns = Vec::new();
        let mut extractors = Vec::new();
        match &stmt.projection {
            crate::ast::Projection::Star => {
                for (table_index, table) in tables.iter().enumerate() {
                    for (column_index, column) in table.columns.iter().enumerate() {
                        columns.push(column.name.clone());
                        extractors.push((table_index, column_index));
                    }
                }
            }
            crate::ast::Projection::Columns(references) => {
                let scope_tables = &tables;
                for reference in references {
                    let probe = Scope {
                        tables: scope_tables,
                        rows: &[],
                    };
                    let (table_index, column_index) = probe.resolve_index(reference)?;
                    columns.push(scope_tables[table_index].columns[column_index].name.clone());
                    extractors.push((table_index, column_index));
                }
            }
        }

        let rows = window
            .iter()
            .map(|context| {
                extractors
                    .iter()
                    .map(|&(table_index, column_index)| context[table_index][column_index].clone())
                    .collect()
            })
            .collect();

        Ok(ResultSet::new(columns, rows))
    }

    /// Runs an INSERT.
    ///
    /// # Returns
    /// The exec result (rows inserted plus the last auto-assigned serial)
    /// and, when the statement carries RETURNING, a result set with the
    /// returned key per inserted row.
    pub fn run_insert(
        &self,
        stmt: &InsertStmt,
    ) -> Result<(ExecResult, Option<ResultSet>), AdapterError> {
        let table = self.store.table(&stmt.table)?;

        let returning_index = match &stmt.returning {
            Some(column) => Some(table.column_index(column).ok_or_else(|| {
                AdapterError::ColumnNotFound {
                    table: table.name.clone(),
                    column: column.clone(),
                }
            })?),
            None => None,
        };

        // Each spec is one row: per-column Some(value) or None for default
        let mut specs: Vec<Vec<Option<Value>>> = Vec::new();
        match &stmt.body {
            InsertBody::DefaultValues => {
                specs.push(vec![None; table.columns.len()]);
            }
            InsertBody::Values { columns, rows } => {
                let indices: Vec<usize> = if columns.is_empty() {
                    (0..table.columns.len()).collect()
                } else {
                    let mut resolved = Vec::with_capacity(columns.len());
                    for column in columns {
                        resolved.push(table.column_index(column).ok_or_else(|| {
                            AdapterError::ColumnNotFound {
                                table: table.name.clone(),
                                column: column.clone(),
                            }
                        })?);
                    }
                    resolved
                };

                for row in rows {
                    // The empty mysql-style row `()` means all defaults
                    if !row.is_empty() && row.len() != indices.len() {
                        return Err(AdapterError::syntax(format!(
                            "{} values for {} columns",
                            row.len(),
                            indices.len()
                        )));
                    }

                    let mut spec = vec![None; table.columns.len()];
                    for (position, expr) in row.iter().enumerate() {
                        let value = match expr {
                            Expr::Default => None,
                            other => Some(self.eval_scalar(other)?),
                        };
                        spec[indices[position]] = value;
                    }
                    specs.push(spec);
                }
            }
        }

        let serial_index = table.serial_index();
        let mut affected = 0u64;
        let mut last_serial = None;
        let mut returned = Vec::new();

        for spec in specs {
            let mut row = Vec::with_capacity(table.columns.len());
            for (index, provided) in spec.into_iter().enumerate() {
                let value = match provided {
                    Some(value) => {
                        if serial_index == Some(index) {
                            if let Value::Integer(key) = value {
                                table.observe_serial(key);
                            }
                        }
                        value
                    }
                    None => {
                        if serial_index == Some(index) {
                            let key = table.assign_serial();
                            last_serial = Some(key);
                            Value::Integer(key)
                        } else {
                            table.columns[index].default.clone().unwrap_or(Value::Null)
                        }
                    }
                };
                row.push(value);
            }

            if let Some(index) = returning_index {
                returned.push(vec![row[index].clone()]);
            }
            table.insert_row(row)?;
            affected += 1;
        }

        let result = ExecResult {
            affected_rows: affected,
            insert_id: last_serial,
        };
        let returning = returning_index.map(|index| {
            ResultSet::new(vec![table.columns[index].name.clone()], returned)
        });
        Ok((result, returning))
    }

    /// Runs an UPDATE; assignments see the pre-update row.
    pub fn run_update(&self, stmt: &UpdateStmt) -> Result<ExecResult, AdapterError> {
        let table = self.store.table(&stmt.table)?;
        let tables = vec![table.clone()];

        let mut assignments = Vec::with_capacity(stmt.assignments.len());
        for (column, expr) in &stmt.assignments {
            let index = table.column_index(column).ok_or_else(|| {
                AdapterError::ColumnNotFound {
                    table: table.name.clone(),
                    column: column.clone(),
                }
            })?;
            assignments.push((index, expr));
        }

        let snapshot = table.snapshot();
        let mut next = Vec::with_capacity(snapshot.len());
        let mut affected = 0u64;

        for row in snapshot.iter() {
            let context = vec![row.clone()];
            let scope = Scope {
                tables: &tables,
                rows: &context,
            };
            let matches = match &stmt.filter {
                Some(filter) => truth(&self.eval(filter, &scope)?),
                None => true,
            };

            if matches {
                let mut updated = row.as_ref().clone();
                for (index, expr) in &assignments {
                    updated[*index] = self.eval(expr, &scope)?;
                }
                next.push(Arc::new(updated));
                affected += 1;
            } else {
                next.push(row.clone());
            }
        }

        table.replace_rows(next)?;
        Ok(ExecResult {
            affected_rows: affected,
            insert_id: None,
        })
    }

    /// Runs a DELETE.
    pub fn run_delete(&self, stmt: &DeleteStmt) -> Result<ExecResult, AdapterError> {
        let table = self.store.table(&stmt.table)?;
        let tables = vec![table.clone()];

        let snapshot = table.snapshot();
        let mut kept = Vec::with_capacity(snapshot.len());
        let mut affected = 0u64;

        for row in snapshot.iter() {
            let context = vec![row.clone()];
            let scope = Scope {
                tables: &tables,
                rows: &context,
            };
            let matches = match &stmt.filter {
                Some(filter) => truth(&self.eval(filter, &scope)?),
                None => true,
            };
            if matches {
                affected += 1;
            } else {
                kept.push(row.clone());
            }
        }

        table.replace_rows(kept)?;
        Ok(ExecResult {
            affected_rows: affected,
            insert_id: None,
        })
    }

    fn eval(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value, AdapterError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Default => Err(AdapterError::syntax("DEFAULT outside an INSERT value list")),
            Expr::Placeholder(index) => self.bind(*index),
            Expr::Column(reference) => scope.value(reference),
            Expr::Not(operand) => {
                let value = self.eval(operand, scope)?;
                Ok(match truth3(&value)? {
                    Some(flag) => Value::Boolean(!flag),
                    None => Value::Null,
                })
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                match op {
                    BinaryOp::And => {
                        let left = truth3(&left)?;
                        let right = truth3(&right)?;
                        Ok(match (left, right) {
                            (Some(false), _) | (_, Some(false)) => Value::Boolean(false),
                            (Some(true), Some(true)) => Value::Boolean(true),
                            _ => Value::Null,
                        })
                    }
                    BinaryOp::Or => {
                        let left = truth3(&left)?;
                        let right = truth3(&right)?;
                        Ok(match (left, right) {
                            (Some(true), _) | (_, Some(true)) => Value::Boolean(true),
                            (Some(false), Some(false)) => Value::Boolean(false),
                            _ => Value::Null,
                        })
                    }
                    comparison => compare(*comparison, left, right),
                }
            }
            Expr::IsNull { operand, negated } => {
                let value = self.eval(operand, scope)?;
                Ok(Value::Boolean(value.is_null() != *negated))
            }
            Expr::In {
                operand,
                list,
                negated,
            } => {
                let operand = self.eval(operand, scope)?;
                let members = match list {
                    InList::Values(exprs) => {
                        let mut members = Vec::with_capacity(exprs.len());
                        for expr in exprs {
                            members.push(self.eval(expr, scope)?);
                        }
                        members
                    }
                    InList::Subquery(subquery) => {
                        let result = self.run_select(subquery)?;
                        if result.columns.len() != 1 {
                            return Err(AdapterError::syntax(
                                "IN subquery must return exactly one column",
                            ));
                        }
                        result
                            .rows
                            .into_iter()
                            .map(|mut row| row.pop().unwrap_or(Value::Null))
                            .collect()
                    }
                };

                // An empty member set decides regardless of NULL operands
                if members.is_empty() {
                    return Ok(Value::Boolean(*negated));
                }
                if operand.is_null() {
                    return Ok(Value::Null);
                }

                let mut found = false;
                let mut saw_null = false;
                for member in &members {
                    if member.is_null() {
                        saw_null = true;
                    } else if values_equal(&operand, member) {
                        found = true;
                        break;
                    }
                }

                Ok(match (found, saw_null) {
                    (true, _) => Value::Boolean(!*negated),
                    (false, true) => Value::Null,
                    (false, false) => Value::Boolean(*negated),
                })
            }
        }
    }

    /// Evaluates an expression outside any row scope (INSERT value lists).
    fn eval_scalar(&self, expr: &Expr) -> Result<Value, AdapterError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Placeholder(index) => self.bind(*index),
            other => Err(AdapterError::syntax(format!(
                "unsupported expression in value list: {:?}",
                other
            ))),
        }
    }

    fn bind(&self, index: usize) -> Result<Value, AdapterError> {
        self.binds
            .get(index)
            .cloned()
            .ok_or(AdapterError::BindMismatch {
                expected: index + 1,
                supplied: self.binds.len(),
            })
    }
}

/// Definite truth: only `TRUE` survives a WHERE.
fn truth(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

/// Three-valued truth of a predicate result.
fn truth3(value: &Value) -> Result<Option<bool>, AdapterError> {
    match value {
        Value::Boolean(flag) => Ok(Some(*flag)),
        Value::Null => Ok(None),
        other => Err(AdapterError::TypeMismatch {
            expected: "boolean".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

fn compare(op: BinaryOp, left: Value, right: Value) -> Result<Value, AdapterError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    match op {
        BinaryOp::Eq => Ok(Value::Boolean(values_equal(&left, &right))),
        BinaryOp::Ne => Ok(Value::Boolean(!values_equal(&left, &right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = order_values(&left, &right)?;
            let result = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                BinaryOp::Ge => ordering != Ordering::Less,
                _ => unreachable!(),
            };
            Ok(Value::Boolean(result))
        }
        BinaryOp::And | BinaryOp::Or => Err(AdapterError::syntax(
            "logical connective evaluated as comparison",
        )),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            (*a as f64) == *b
        }
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => false,
    }
}

fn order_values(left: &Value, right: &Value) -> Result<Ordering, AdapterError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
        (Value::Integer(a), Value::Float(b)) => {
            Ok((*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal))
        }
        (Value::Float(a), Value::Integer(b)) => {
            Ok(a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal))
        }
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
        _ => Err(AdapterError::TypeMismatch {
            expected: left.type_name().to_string(),
            got: right.type_name().to_string(),
        }),
    }
}

/// Total order used by ORDER BY: NULL sorts first, then by type rank.
fn sort_compare(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }

    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        _ => match rank(left).cmp(&rank(right)) {
            Ordering::Equal => order_values(left, right).unwrap_or(Ordering::Equal),
            unequal => unequal,
        },
    }
}
