//! Statement rendering: abstract queries to dialect SQL with collected binds.
//!
//! All SQL text leaving the adapter is produced here. Binds are collected in
//! placeholder order, recursing into inclusion subqueries, so a rendered
//! [`Statement`] always satisfies its own bind-arity validation.

use crate::dialect::Dialect;
use crate::error::AdapterError;
use crate::query::{Condition, Direction, InValues, Query};
use crate::schema::{Column, TableSchema};
use crate::statement::{check_binds, Statement};
use crate::value::Value;

/// Renders an INSERT for the given record, omitting NULL-valued columns.
///
/// # Arguments
/// * `dialect` - Target dialect
/// * `schema` - Table written to
/// * `record` - Column/value pairs; NULL values are dropped from the
///   statement entirely
///
/// # Returns
/// `Result<Statement, AdapterError>` with the rendered INSERT. When every
/// column is omitted the dialect's all-default form is used; a generated
/// key is fetched via RETURNING where the dialect supports it, and writing
/// an explicit value into a serial column goes through the dialect's
/// serial-insert wrapping.
pub fn render_insert(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    record: &[(String, Value)],
) -> Result<Statement, AdapterError> {
    let mut present: Vec<(&Column, &Value)> = Vec::new();
    for (name, value) in record {
        let column = schema
            .column(name)
            .ok_or_else(|| AdapterError::ColumnNotFound {
                table: schema.name.clone(),
                column: name.clone(),
            })?;
        if !value.is_null() {
            present.push((column, value));
        }
    }

    let mut sql = format!("INSERT INTO {}", dialect.quote_identifier(&schema.name));
    let mut binds = Vec::with_capacity(present.len());

    if present.is_empty() {
        sql.push(' ');
        sql.push_str(&dialect.default_values_clause(schema));
    } else {
        let columns = present
            .iter()
            .map(|(column, _)| dialect.quote_identifier(&column.name))
            .collect::<Vec<_>>()
            .join(", ");
        let markers = vec!["?"; present.len()].join(", ");
        sql.push_str(&format!(" ({}) VALUES ({})", columns, markers));
        binds.extend(present.iter().map(|(_, value)| (*value).clone()));
    }

    let explicit_serial = present.iter().any(|(column, _)| column.is_serial());
    if let Some(serial) = schema.serial_column() {
        if !explicit_serial {
            if let Some(clause) = dialect.returning_clause(serial) {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }
    }

    let sql = if explicit_serial {
        dialect.wrap_serial_insert(schema, sql)
    } else {
        sql
    };

    Ok(Statement::new(sql, binds))
}

/// Renders a SELECT for the given query.
///
/// Query paths become deduplicated INNER JOINs; raw conditions are
/// bind-validated before anything executes.
pub fn render_select(dialect: &dyn Dialect, query: &Query) -> Result<Statement, AdapterError> {
    let parts = render_select_parts(dialect, query)?;
    Ok(Statement::new(parts.sql, parts.binds))
}

/// Renders an UPDATE setting the given columns on rows matched by `query`.
///
/// Query paths are not supported in UPDATE statements.
pub fn render_update(
    dialect: &dyn Dialect,
    query: &Query,
    values: &[(String, Value)],
) -> Result<Statement, AdapterError> {
    if values.is_empty() {
        return Err(AdapterError::Unsupported("UPDATE with no columns to set"));
    }
    reject_paths(query, "query paths in UPDATE")?;

    let table = &query.table;
    let mut binds = Vec::with_capacity(values.len());
    let mut assignments = Vec::with_capacity(values.len());
    for (name, value) in values {
        let column = table
            .column(name)
            .ok_or_else(|| AdapterError::ColumnNotFound {
                table: table.name.clone(),
                column: name.clone(),
            })?;
        assignments.push(format!("{} = ?", dialect.quote_identifier(&column.name)));
        binds.push(value.clone());
    }

    let mut sql = format!(
        "UPDATE {} SET {}",
        dialect.quote_identifier(&table.name),
        assignments.join(", ")
    );
    append_where(dialect, query, &mut sql, &mut binds)?;

    Ok(Statement::new(sql, binds))
}

/// Renders a DELETE for rows matched by `query`.
///
/// Query paths are not supported in DELETE statements.
pub fn render_delete(dialect: &dyn Dialect, query: &Query) -> Result<Statement, AdapterError> {
    reject_paths(query, "query paths in DELETE")?;

    let mut sql = format!("DELETE FROM {}", dialect.quote_identifier(&query.table.name));
    let mut binds = Vec::new();
    append_where(dialect, query, &mut sql, &mut binds)?;

    Ok(Statement::new(sql, binds))
}

struct SelectParts {
    sql: String,
    binds: Vec<Value>,
}

fn render_select_parts(
    dialect: &dyn Dialect,
    query: &Query,
) -> Result<SelectParts, AdapterError> {
    let table = &query.table;

    // Resolve joins up front; every path condition must name a relation.
    let mut joins = Vec::new();
    for condition in &query.conditions {
        if let Condition::Path { relation, .. } = condition {
            let relation = table.find_relation(relation).ok_or_else(|| {
                AdapterError::RelationNotFound {
                    table: table.name.clone(),
                    relation: relation.clone(),
                }
            })?;
            if !joins
                .iter()
                .any(|existing: &&crate::schema::Relation| existing.name == relation.name)
            {
                joins.push(relation);
            }
        }
    }
    let qualify = !joins.is_empty();

    let mut columns = Vec::new();
    for field in query.projection() {
        columns.push(column_reference(dialect, table, &field, qualify)?);
    }

    let mut sql = format!(
        "SELECT {} FROM {}",
        columns.join(", "),
        dialect.quote_identifier(&table.name)
    );

    for relation in &joins {
        sql.push_str(&format!(
            " INNER JOIN {to} ON {from}.{from_field} = {to}.{to_field}",
            to = dialect.quote_identifier(&relation.to_table),
            from = dialect.quote_identifier(&table.name),
            from_field = dialect.quote_identifier(&relation.from_field),
            to_field = dialect.quote_identifier(&relation.to_field),
        ));
    }

    let mut binds = Vec::new();
    append_conditions(dialect, query, qualify, &mut sql, &mut binds)?;

    if !query.order.is_empty() {
        let mut keys = Vec::with_capacity(query.order.len());
        for order in &query.order {
            let direction = match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            keys.push(format!(
                "{} {}",
                column_reference(dialect, table, &order.column, qualify)?,
                direction
            ));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }

    if let Some(clause) = dialect.limit_clause(query.limit, query.offset) {
        sql.push(' ');
        sql.push_str(&clause);
    }

    Ok(SelectParts { sql, binds })
}

fn append_where(
    dialect: &dyn Dialect,
    query: &Query,
    sql: &mut String,
    binds: &mut Vec<Value>,
) -> Result<(), AdapterError> {
    append_conditions(dialect, query, false, sql, binds)
}

fn append_conditions(
    dialect: &dyn Dialect,
    query: &Query,
    qualify: bool,
    sql: &mut String,
    binds: &mut Vec<Value>,
) -> Result<(), AdapterError> {
    if query.conditions.is_empty() {
        return Ok(());
    }

    let mut predicates = Vec::with_capacity(query.conditions.len());
    for condition in &query.conditions {
        predicates.push(render_condition(dialect, query, condition, qualify, binds)?);
    }
    sql.push_str(" WHERE ");
    sql.push_str(&predicates.join(" AND "));
    Ok(())
}

fn render_condition(
    dialect: &dyn Dialect,
    query: &Query,
    condition: &Condition,
    qualify: bool,
    binds: &mut Vec<Value>,
) -> Result<String, AdapterError> {
    let table = &query.table;
    match condition {
        Condition::Raw {
            sql,
            binds: raw_binds,
        } => {
            check_binds(sql, raw_binds.len())?;
            binds.extend(raw_binds.iter().cloned());
            Ok(format!("({})", sql))
        }
        Condition::Eq { column, value } => {
            let reference = column_reference(dialect, table, column, qualify)?;
            if value.is_null() {
                Ok(format!("{} IS NULL", reference))
            } else {
                binds.push(value.clone());
                Ok(format!("{} = ?", reference))
            }
        }
        Condition::In {
            column,
            values,
            negated,
        } => {
            let reference = column_reference(dialect, table, column, qualify)?;
            match values {
                InValues::List(list) => Ok(render_in_list(&reference, list, *negated, binds)),
                InValues::Subquery(inner) => {
                    if inner.projection().len() != 1 {
                        return Err(AdapterError::Unsupported(
                            "inclusion subquery must project exactly one column",
                        ));
                    }
                    let parts = render_select_parts(dialect, inner)?;
                    binds.extend(parts.binds);
                    let keyword = if *negated { "NOT IN" } else { "IN" };
                    Ok(format!("{} {} ({})", reference, keyword, parts.sql))
                }
            }
        }
        Condition::Path {
            relation,
            column,
            value,
        } => {
            let relation = table.find_relation(relation).ok_or_else(|| {
                AdapterError::RelationNotFound {
                    table: table.name.clone(),
                    relation: relation.clone(),
                }
            })?;
            let reference = format!(
                "{}.{}",
                dialect.quote_identifier(&relation.to_table),
                dialect.quote_identifier(column)
            );
            if value.is_null() {
                Ok(format!("{} IS NULL", reference))
            } else {
                binds.push(value.clone());
                Ok(format!("{} = ?", reference))
            }
        }
    }
}

/// Inclusion over a materialized list.
///
/// NULL among the values widens the match to rows whose column is SQL NULL;
/// an empty list renders a constant predicate so the SQL stays well-formed.
fn render_in_list(
    reference: &str,
    list: &[Value],
    negated: bool,
    binds: &mut Vec<Value>,
) -> String {
    let has_null = list.iter().any(Value::is_null);
    let values: Vec<&Value> = list.iter().filter(|v| !v.is_null()).collect();

    let membership = if values.is_empty() {
        None
    } else {
        let markers = vec!["?"; values.len()].join(", ");
        binds.extend(values.iter().map(|v| (*v).clone()));
        let keyword = if negated { "NOT IN" } else { "IN" };
        Some(format!("{} {} ({})", reference, keyword, markers))
    };

    match (membership, has_null, negated) {
        (None, false, false) => "1 = 0".to_string(),
        (None, false, true) => "1 = 1".to_string(),
        (None, true, false) => format!("{} IS NULL", reference),
        (None, true, true) => format!("{} IS NOT NULL", reference),
        (Some(membership), false, _) => membership,
        (Some(membership), true, false) => {
            format!("({} OR {} IS NULL)", membership, reference)
        }
        (Some(membership), true, true) => {
            format!("({} AND {} IS NOT NULL)", membership, reference)
        }
    }
}

fn column_reference(
    dialect: &dyn Dialect,
    table: &TableSchema,
    column: &str,
    qualify: bool,
) -> Result<String, AdapterError> {
    if table.column(column).is_none() {
        return Err(AdapterError::ColumnNotFound {
            table: table.name.clone(),
            column: column.to_string(),
        });
    }
    if qualify {
        Ok(format!(
            "{}.{}",
            dialect.quote_identifier(&table.name),
            dialect.quote_identifier(column)
        ))
    } else {
        Ok(dialect.quote_identifier(column))
    }
}

fn reject_paths(query: &Query, what: &'static str) -> Result<(), AdapterError> {
    if query
        .conditions
        .iter()
        .any(|c| matches!(c, Condition::Path { .. }))
    {
        return Err(AdapterError::Unsupported(what));
    }
    Ok(())
}
