//! Oracle dialect.

use super::Dialect;
use crate::schema::TableSchema;

/// Oracle dialect.
///
/// Identifiers are rendered upper-case and double-quoted, matching how
/// Oracle folds unquoted names. An all-default INSERT writes the key
/// column explicitly as `(…) VALUES (DEFAULT)`, and generated keys come
/// back through `RETURNING`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.to_uppercase().replace('"', "\"\""))
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_insert_id(&self) -> bool {
        true
    }

    fn default_values_clause(&self, schema: &TableSchema) -> String {
        match schema.serial_column() {
            Some(key) => format!("({}) VALUES (DEFAULT)", self.quote_identifier(&key.name)),
            None => "() VALUES ()".to_string(),
        }
    }

    fn limit_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(limit), Some(offset)) => Some(format!(
                "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                offset, limit
            )),
            (Some(limit), None) => Some(format!("FETCH FIRST {} ROWS ONLY", limit)),
            (None, Some(offset)) => Some(format!("OFFSET {} ROWS", offset)),
            (None, None) => None,
        }
    }
}
