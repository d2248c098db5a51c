//! Abstract query descriptions turned into dialect SQL by the renderer.

use crate::schema::TableSchema;
use crate::value::Value;

/// Right-hand side of an inclusion filter.
///
/// A materialized collection renders as a placeholder list; a deferred one
/// renders as a single-column subquery, so the whole filter still executes
/// as one statement.
#[derive(Debug, Clone)]
pub enum InValues {
    /// Materialized collection of values
    List(Vec<Value>),
    /// Deferred collection described by a query projecting one column
    Subquery(Box<Query>),
}

impl InValues {
    /// Returns `true` when the collection is materialized.
    pub fn is_loaded(&self) -> bool {
        matches!(self, InValues::List(_))
    }
}

/// Filter condition within a query.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Verbatim SQL fragment with positional `?` binds
    Raw { sql: String, binds: Vec<Value> },
    /// Column equality; a NULL value renders `IS NULL`
    Eq { column: String, value: Value },
    /// Inclusion filter over a collection of values
    In {
        column: String,
        values: InValues,
        negated: bool,
    },
    /// Equality on a column reached through a named relation
    Path {
        relation: String,
        column: String,
        value: Value,
    },
}

impl Condition {
    /// Raw SQL fragment condition.
    pub fn raw(sql: impl Into<String>, binds: Vec<Value>) -> Self {
        Condition::Raw {
            sql: sql.into(),
            binds,
        }
    }

    /// Column equality condition.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Inclusion in a materialized collection.
    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Self {
        Condition::In {
            column: column.into(),
            values: InValues::List(values),
            negated: false,
        }
    }

    /// Inclusion in a deferred collection.
    pub fn in_query(column: impl Into<String>, query: Query) -> Self {
        Condition::In {
            column: column.into(),
            values: InValues::Subquery(Box::new(query)),
            negated: false,
        }
    }

    /// Exclusion from a materialized collection.
    pub fn not_in_list(column: impl Into<String>, values: Vec<Value>) -> Self {
        Condition::In {
            column: column.into(),
            values: InValues::List(values),
            negated: true,
        }
    }

    /// Exclusion from a deferred collection.
    pub fn not_in_query(column: impl Into<String>, query: Query) -> Self {
        Condition::In {
            column: column.into(),
            values: InValues::Subquery(Box::new(query)),
            negated: true,
        }
    }

    /// Equality on a column reached through a named relation.
    pub fn path(
        relation: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Condition::Path {
            relation: relation.into(),
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort key.
#[derive(Debug, Clone)]
pub struct Order {
    /// Column to sort by
    pub column: String,
    /// Sort direction
    pub direction: Direction,
}

/// Structured read description against one table.
#[derive(Debug, Clone)]
pub struct Query {
    /// Schema of the table read from
    pub table: TableSchema,
    /// Projected columns; empty means every column in schema order
    pub fields: Vec<String>,
    /// Filter conditions, combined with AND
    pub conditions: Vec<Condition>,
    /// Sort keys
    pub order: Vec<Order>,
    /// Maximum rows returned
    pub limit: Option<u64>,
    /// Rows skipped
    pub offset: Option<u64>,
}

impl Query {
    /// Creates a query over the given table selecting every column.
    pub fn new(table: &TableSchema) -> Self {
        Self {
            table: table.clone(),
            fields: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Restricts the projection to the given columns, in request order.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Adds a filter condition.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a sort key.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.into(),
            direction,
        });
        self
    }

    /// Limits the number of rows returned.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the given number of rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns the effective projection: requested fields, or every column.
    pub fn projection(&self) -> Vec<String> {
        if self.fields.is_empty() {
            self.table.column_names()
        } else {
            self.fields.clone()
        }
    }
}
