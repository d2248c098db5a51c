//! SQL Server dialect.

use super::Dialect;
use crate::schema::TableSchema;

/// SQL Server dialect.
///
/// Bracket-quoted identifiers. Writing an explicit value into an identity
/// column requires toggling `IDENTITY_INSERT` around the statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("[{}]", identifier.replace(']', "]]"))
    }

    fn wrap_serial_insert(&self, schema: &TableSchema, statement: String) -> String {
        let table = self.quote_identifier(&schema.name);
        format!(
            "SET IDENTITY_INSERT {table} ON {statement} SET IDENTITY_INSERT {table} OFF",
            table = table,
            statement = statement
        )
    }

    fn limit_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), offset) => Some(format!(
                "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                offset.unwrap_or(0),
                limit
            )),
            (None, Some(offset)) => Some(format!("OFFSET {} ROWS", offset)),
            (None, None) => None,
        }
    }
}
