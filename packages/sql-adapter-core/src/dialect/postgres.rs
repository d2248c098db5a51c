//! PostgreSQL dialect.

use super::Dialect;

/// PostgreSQL dialect.
///
/// Double-quoted identifiers, `DEFAULT VALUES`, and `RETURNING` for
/// generated keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_insert_id(&self) -> bool {
        true
    }
}
