//! Structured reads: raw conditions, inclusion filters, query paths.

use ntest::timeout;
use sql_adapter_core::{
    Adapter, Column, Condition, Query, Row, TableSchema, Value,
};

use super::helpers::{
    authors, create_tree_article, memory_adapter, publishers, seed_parent_chain, tree_articles,
};

fn article_row(name: &str, description: Option<&str>, parent: Option<&str>) -> Row {
    Row::new(vec![
        ("name".to_string(), Value::from(name)),
        ("description".to_string(), Value::from(description)),
        ("parent_name".to_string(), Value::from(parent)),
    ])
}

fn chain_adapter() -> (Adapter, TableSchema) {
    let schema = tree_articles();
    let adapter = memory_adapter("ansi", &[schema.clone()]);
    seed_parent_chain(&adapter, &schema);
    adapter.log().clear();
    (adapter, schema)
}

/// Rows `Test 1` through `Test 4`: every article with a parent.
fn chain_children() -> Vec<Row> {
    (1..5)
        .map(|index| {
            article_row(
                &format!("Test {}", index),
                None,
                Some(&format!("Test {}", index - 1)),
            )
        })
        .collect()
}

#[test]
fn test_read_with_raw_condition_returns_matching_rows() {
    let schema = tree_articles();
    let adapter = memory_adapter("ansi", &[schema.clone()]);
    create_tree_article(&adapter, &schema, "Test", Some("Description"), None);
    create_tree_article(&adapter, &schema, "NoDescription", None, None);

    let query = Query::new(&schema).filter(Condition::raw("description IS NOT NULL", vec![]));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, vec![article_row("Test", Some("Description"), None)]);
}

#[test]
fn test_read_with_bind_mismatch_raises_before_execution() {
    let schema = tree_articles();
    let adapter = memory_adapter("ansi", &[schema.clone()]);
    create_tree_article(&adapter, &schema, "Test", None, None);
    adapter.log().clear();

    let query =
        Query::new(&schema).filter(Condition::raw("name IS NOT NULL", vec![Value::Null]));
    let err = adapter.read(&query).unwrap_err();

    assert_eq!(err.to_string(), "Binding mismatch: 1 for 0");
    assert!(adapter.log().is_empty());
}

#[test]
#[timeout(2000)]
fn test_deferred_inclusion_executes_one_subquery_statement() {
    let (adapter, schema) = chain_adapter();

    let parents = Query::new(&schema).fields(&["name"]);
    let query = Query::new(&schema).filter(Condition::in_query("parent_name", parents));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, chain_children());
    let statements = adapter.log().statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].contains("IN (SELECT"));
}

#[test]
#[timeout(2000)]
fn test_loaded_inclusion_executes_one_statement() {
    let (adapter, schema) = chain_adapter();

    // Materialize the collection first, the way a loaded collection would be
    let parents = Query::new(&schema).fields(&["name"]);
    let names: Vec<Value> = adapter
        .read(&parents)
        .unwrap()
        .iter()
        .map(|row| row.get("name").cloned().unwrap())
        .collect();
    assert_eq!(names.len(), 5);

    adapter.log().clear();
    let query = Query::new(&schema).filter(Condition::in_list("parent_name", names));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, chain_children());
    let statements = adapter.log().statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].contains("IN (?, ?, ?, ?, ?)"));
}

#[test]
fn test_negated_deferred_inclusion_matches_nothing() {
    let (adapter, schema) = chain_adapter();

    let parents = Query::new(&schema).fields(&["name"]);
    let query = Query::new(&schema).filter(Condition::not_in_query("parent_name", parents));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, Vec::<Row>::new());
    assert_eq!(adapter.log().len(), 1);
}

#[test]
fn test_negated_loaded_inclusion_matches_nothing() {
    let (adapter, schema) = chain_adapter();

    let parents = Query::new(&schema).fields(&["name"]);
    let names: Vec<Value> = adapter
        .read(&parents)
        .unwrap()
        .iter()
        .map(|row| row.get("name").cloned().unwrap())
        .collect();

    adapter.log().clear();
    let query = Query::new(&schema).filter(Condition::not_in_list("parent_name", names));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, Vec::<Row>::new());
    assert_eq!(adapter.log().len(), 1);
}

#[test]
fn test_inclusion_of_nil_matches_null_columns() {
    let (adapter, schema) = chain_adapter();

    let query =
        Query::new(&schema).filter(Condition::in_list("parent_name", vec![Value::Null]));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows, vec![article_row("Test 0", None, None)]);
}

#[test]
fn test_inclusion_of_nil_and_values_matches_both() {
    let (adapter, schema) = chain_adapter();

    let query = Query::new(&schema).filter(Condition::in_list(
        "parent_name",
        vec![Value::Null, Value::from("Test 3")],
    ));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(
        rows,
        vec![
            article_row("Test 0", None, None),
            article_row("Test 4", None, Some("Test 3")),
        ]
    );
}

#[test]
fn test_deferred_inclusion_counts_are_uniform_across_dialects() {
    let schema = tree_articles();
    let adapter = memory_adapter("mysql", &[schema.clone()]);
    seed_parent_chain(&adapter, &schema);
    adapter.log().clear();

    let parents = Query::new(&schema).fields(&["name"]);
    let query = Query::new(&schema).filter(Condition::in_query("parent_name", parents));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(adapter.log().len(), 1);
}

#[test]
fn test_query_path_joins_through_relations() {
    let simple_articles = TableSchema::new("articles", vec![Column::text("name").key()]);
    let adapter = memory_adapter(
        "ansi",
        &[simple_articles.clone(), publishers(), authors()],
    );

    adapter
        .create(
            &simple_articles,
            &[("name".to_string(), Value::from("Adapters at Scale"))],
        )
        .unwrap();
    adapter
        .create(
            &publishers(),
            &[("name".to_string(), Value::from("Northlight Press"))],
        )
        .unwrap();
    adapter
        .create(
            &authors(),
            &[
                ("name".to_string(), Value::from("Sam Doe")),
                (
                    "article_name".to_string(),
                    Value::from("Adapters at Scale"),
                ),
                (
                    "publisher_name".to_string(),
                    Value::from("Northlight Press"),
                ),
            ],
        )
        .unwrap();
    adapter.log().clear();

    let query = Query::new(&authors())
        .filter(Condition::path("article", "name", "Adapters at Scale"))
        .filter(Condition::path("publisher", "name", "Northlight Press"));
    let rows = adapter.read(&query).unwrap();

    assert_eq!(
        rows,
        vec![Row::new(vec![
            ("name".to_string(), Value::from("Sam Doe")),
            (
                "article_name".to_string(),
                Value::from("Adapters at Scale")
            ),
            (
                "publisher_name".to_string(),
                Value::from("Northlight Press")
            ),
        ])]
    );
    assert_eq!(adapter.log().len(), 1);
}

#[test]
fn test_update_and_delete_through_the_adapter() {
    let schema = tree_articles();
    let adapter = memory_adapter("ansi", &[schema.clone()]);
    create_tree_article(&adapter, &schema, "Test", Some("old"), None);
    create_tree_article(&adapter, &schema, "Other", None, None);

    let target = Query::new(&schema).filter(Condition::eq("name", "Test"));
    let updated = adapter
        .update(
            &target,
            &[("description".to_string(), Value::from("new"))],
        )
        .unwrap();
    assert_eq!(updated, 1);

    let rows = adapter.read(&target).unwrap();
    assert_eq!(rows, vec![article_row("Test", Some("new"), None)]);

    let deleted = adapter.delete(&target).unwrap();
    assert_eq!(deleted, 1);
    assert!(adapter.read(&target).unwrap().is_empty());
}
