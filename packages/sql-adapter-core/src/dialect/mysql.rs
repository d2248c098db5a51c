//! MySQL dialect.

use super::Dialect;

/// MySQL dialect.
///
/// Backtick-quoted identifiers; no `DEFAULT VALUES` form (an all-default
/// INSERT is written `() VALUES ()`); generated keys come back as the
/// connection's insert id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mysql;

impl Dialect for Mysql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn supports_default_values(&self) -> bool {
        false
    }

    fn supports_insert_id(&self) -> bool {
        true
    }
}
