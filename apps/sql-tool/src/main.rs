//! CLI for the SQL adapter layer.
//!
//! Provides commands for:
//! - Rendering a record's INSERT across dialects
//! - Running statements against an in-memory store

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use sql_adapter_core::{dialect_for, render, SelectResult, TableSchema, Value};
use sql_adapter_runtime::AdapterRegistry;

/// Command-line arguments for the SQL tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a record's INSERT statement across dialects
    Render {
        /// Schema file: a JSON array of table schemas
        #[arg(long)]
        schema: PathBuf,

        /// Table to insert into
        #[arg(long)]
        table: String,

        /// Column values as COLUMN=VALUE pairs
        #[arg(long = "set", value_name = "COLUMN=VALUE")]
        sets: Vec<String>,

        /// Render for one dialect instead of all of them
        #[arg(long)]
        dialect: Option<String>,
    },
    /// Execute statements against an in-memory store
    Exec {
        /// Schema file: a JSON array of table schemas
        #[arg(long)]
        schema: PathBuf,

        /// Dialect the statements are written in
        #[arg(long, default_value = "ansi")]
        dialect: String,

        /// Statements, run in order
        #[arg(required = true)]
        statements: Vec<String>,
    },
}

const ALL_DIALECTS: [&str; 5] = ["ansi", "mysql", "postgres", "sqlserver", "oracle"];

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.command {
        Command::Render {
            schema,
            table,
            sets,
            dialect,
        } => render_command(&schema, &table, &sets, dialect.as_deref()),
        Command::Exec {
            schema,
            dialect,
            statements,
        } => exec_command(&schema, &dialect, &statements),
    }
}

fn render_command(
    schema_path: &Path,
    table: &str,
    sets: &[String],
    dialect: Option<&str>,
) -> Result<()> {
    let schemas = load_schemas(schema_path)?;
    let schema = schemas
        .iter()
        .find(|s| s.name == table)
        .with_context(|| format!("table '{}' not found in schema file", table))?;

    let mut record = Vec::with_capacity(sets.len());
    for set in sets {
        record.push(parse_set(set)?);
    }

    let names: Vec<&str> = match dialect {
        Some(name) => vec![name],
        None => ALL_DIALECTS.to_vec(),
    };

    for name in names {
        let dialect = dialect_for(name).with_context(|| format!("unknown dialect '{}'", name))?;
        let statement = render::render_insert(dialect.as_ref(), schema, &record)?;
        println!("{:>10}: {}", name, statement.sql);
        if !statement.binds.is_empty() {
            let binds: Vec<String> = statement.binds.iter().map(|v| v.to_string()).collect();
            println!("{:>10}  binds: [{}]", "", binds.join(", "));
        }
    }
    Ok(())
}

fn exec_command(schema_path: &Path, dialect: &str, statements: &[String]) -> Result<()> {
    let schemas = load_schemas(schema_path)?;

    let registry = AdapterRegistry::new();
    let url = format!("memory://cli?dialect={}", dialect);
    let adapter = registry.setup("cli", &url, &schemas)?;
    tracing::debug!(
        "running {} statement(s) with the {} dialect",
        statements.len(),
        dialect
    );

    for statement in statements {
        let head = statement.trim_start();
        let is_select = head
            .get(..6)
            .map(|prefix| prefix.eq_ignore_ascii_case("select"))
            .unwrap_or(false);
        if is_select {
            match adapter.select(statement, &[])? {
                SelectResult::Column(values) => {
                    for value in values {
                        println!("{}", value);
                    }
                }
                SelectResult::Rows(rows) => {
                    if let Some(first) = rows.first() {
                        let header: Vec<&str> =
                            first.fields().iter().map(|(name, _)| name.as_str()).collect();
                        println!("{}", header.join("\t"));
                    }
                    for row in rows {
                        let values: Vec<String> =
                            row.values().iter().map(|v| v.to_string()).collect();
                        println!("{}", values.join("\t"));
                    }
                }
            }
        } else {
            let result = adapter.execute(statement, &[])?;
            match result.insert_id {
                Some(id) => println!(
                    "{} row(s) affected, insert id {}",
                    result.affected_rows, id
                ),
                None => println!("{} row(s) affected", result.affected_rows),
            }
        }
    }
    Ok(())
}

fn load_schemas(path: &Path) -> Result<Vec<TableSchema>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read schema file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("cannot parse schema file {}", path.display()))
}

fn parse_set(set: &str) -> Result<(String, Value)> {
    match set.split_once('=') {
        Some((column, raw)) => Ok((column.to_string(), parse_value(raw))),
        None => bail!("expected COLUMN=VALUE, got '{}'", set),
    }
}

fn parse_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else if raw.eq_ignore_ascii_case("true") {
        Value::Boolean(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Boolean(false)
    } else if let Ok(integer) = raw.parse::<i64>() {
        Value::Integer(integer)
    } else if let Ok(float) = raw.parse::<f64>() {
        Value::Float(float)
    } else {
        Value::Text(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("true"), Value::Boolean(true));
        assert_eq!(parse_value("42"), Value::Integer(42));
        assert_eq!(parse_value("4.5"), Value::Float(4.5));
        assert_eq!(parse_value("plain"), Value::Text("plain".to_string()));
    }

    #[test]
    fn test_parse_set() {
        let (column, value) = parse_set("title=Adapters at Scale").unwrap();
        assert_eq!(column, "title");
        assert_eq!(value, Value::Text("Adapters at Scale".to_string()));
        assert!(parse_set("no-equals").is_err());
    }

    #[test]
    fn test_load_schemas() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "articles", "columns": [
                 {{"name": "id", "column_type": "serial", "key": true}},
                 {{"name": "title", "column_type": "text"}}
               ]}}]"#
        )
        .unwrap();

        let schemas = load_schemas(file.path()).unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "articles");
        assert!(schemas[0].serial_column().is_some());
    }
}
