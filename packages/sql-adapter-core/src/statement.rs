//! Rendered statements and bind-arity validation.

use crate::error::AdapterError;
use crate::value::Value;

/// A rendered SQL statement together with its bind values.
///
/// This is the complete unit of work a driver receives; drivers never see
/// the abstract query it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with positional `?` placeholders
    pub sql: String,
    /// Bind values in placeholder order
    pub binds: Vec<Value>,
}

impl Statement {
    /// Creates a statement.
    pub fn new(sql: impl Into<String>, binds: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    /// Validates that the number of `?` placeholders matches the number of
    /// bind values, before anything reaches a backend.
    ///
    /// # Returns
    /// `Err(AdapterError::BindMismatch)` when the counts differ.
    pub fn validate(&self) -> Result<(), AdapterError> {
        check_binds(&self.sql, self.binds.len())
    }
}

/// Validates a placeholder count against a bind count.
pub fn check_binds(sql: &str, supplied: usize) -> Result<(), AdapterError> {
    let expected = count_placeholders(sql);
    if expected != supplied {
        return Err(AdapterError::BindMismatch { expected, supplied });
    }
    Ok(())
}

/// Counts `?` placeholders outside quoted regions.
///
/// String literals use single quotes with `''` escapes; identifiers may be
/// quoted with double quotes, backticks, or brackets depending on dialect.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '?' => count += 1,
            '\'' => {
                // String literal; '' is an escaped quote
                while let Some(inner) = chars.next() {
                    if inner == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '"' => {
                for inner in chars.by_ref() {
                    if inner == '"' {
                        break;
                    }
                }
            }
            '`' => {
                for inner in chars.by_ref() {
                    if inner == '`' {
                        break;
                    }
                }
            }
            '[' => {
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    count
}
