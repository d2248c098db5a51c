//! Table schema descriptors.
//!
//! Each table has:
//! - Column definitions in declaration order
//! - An optional serial (auto-generated) key column
//! - Optional named relations to other tables

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Auto-incrementing integer key
    Serial,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// Boolean
    Boolean,
    /// Text
    Text,
}

/// Column definition within a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Storage type
    pub column_type: ColumnType,
    /// Whether the column is part of the table key
    #[serde(default)]
    pub key: bool,
    /// Whether a non-NULL value is required
    #[serde(default)]
    pub required: bool,
    /// Default value applied when the column is omitted
    #[serde(default)]
    pub default: Option<Value>,
}

impl Column {
    /// Creates a column of the given type.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            key: false,
            required: false,
            default: None,
        }
    }

    /// Serial key column (always part of the key).
    pub fn serial(name: impl Into<String>) -> Self {
        let mut column = Self::new(name, ColumnType::Serial);
        column.key = true;
        column
    }

    /// Integer column.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// Float column.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Float)
    }

    /// Boolean column.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Text column.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    /// Marks the column as part of the table key.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Marks the column as requiring a non-NULL value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value applied when the column is omitted.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns `true` for serial columns.
    pub fn is_serial(&self) -> bool {
        self.column_type == ColumnType::Serial
    }
}

/// Named many-to-one link between tables.
///
/// `from_field` in the owning table references `to_field` in `to_table`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    /// Relation name used by query paths
    pub name: String,
    /// Field name in source table
    pub from_field: String,
    /// Name of the target table
    pub to_table: String,
    /// Field name in target table
    pub to_field: String,
}

impl Relation {
    /// Creates a relation.
    pub fn new(
        name: impl Into<String>,
        from_field: impl Into<String>,
        to_table: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_field: from_field.into(),
            to_table: to_table.into(),
            to_field: to_field.into(),
        }
    }
}

/// Table schema: name, columns, and relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column definitions in declaration order
    pub columns: Vec<Column>,
    /// Named relations to other tables
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl TableSchema {
    /// Creates a schema with the given name and columns.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            relations: Vec::new(),
        }
    }

    /// Adds a named relation.
    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the serial column, if the table has one.
    pub fn serial_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_serial())
    }

    /// Returns the key columns in declaration order.
    pub fn key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.key).collect()
    }

    /// Looks up a relation by name.
    pub fn find_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Returns every column name in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_shorthands() {
        let id = Column::serial("id");
        assert!(id.key);
        assert!(id.is_serial());

        let name = Column::text("name").key();
        assert!(name.key);
        assert!(!name.is_serial());
    }

    #[test]
    fn test_schema_lookups() {
        let schema = TableSchema::new(
            "articles",
            vec![Column::serial("id"), Column::text("title").required()],
        );

        assert_eq!(schema.serial_column().unwrap().name, "id");
        assert_eq!(schema.key_columns().len(), 1);
        assert!(schema.column("title").unwrap().required);
        assert!(schema.column("missing").is_none());
    }

    #[test]
    fn test_relation_lookup() {
        let schema = TableSchema::new(
            "authors",
            vec![
                Column::text("name").key(),
                Column::text("article_name"),
            ],
        )
        .relation(Relation::new("article", "article_name", "articles", "name"));

        let relation = schema.find_relation("article").unwrap();
        assert_eq!(relation.to_table, "articles");
        assert_eq!(relation.to_field, "name");
        assert!(schema.find_relation("publisher").is_none());
    }
}
