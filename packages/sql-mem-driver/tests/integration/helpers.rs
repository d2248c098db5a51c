//! Shared fixtures for the adapter contract suite.

use sql_adapter_core::{dialect_for, Adapter, Column, Relation, TableSchema, Value};
use sql_mem_driver::MemoryDriver;

/// Builds an adapter for the named dialect over a fresh memory backend
/// with the given tables registered.
pub fn memory_adapter(dialect: &str, schemas: &[TableSchema]) -> Adapter {
    let driver = MemoryDriver::with_schemas(schemas).unwrap();
    let dialect = dialect_for(dialect).unwrap();
    Adapter::new("test", dialect, Box::new(driver))
}

/// Articles with only a serial key.
pub fn serial_articles() -> TableSchema {
    TableSchema::new("articles", vec![Column::serial("id")])
}

/// Articles with a serial key and an optional title.
pub fn titled_articles() -> TableSchema {
    TableSchema::new(
        "articles",
        vec![Column::serial("id"), Column::text("title")],
    )
}

/// Articles keyed by name with a required author.
pub fn keyed_articles() -> TableSchema {
    TableSchema::new(
        "articles",
        vec![Column::text("name").key(), Column::text("author").required()],
    )
}

/// Self-referential articles: name key, optional description, parent link.
pub fn tree_articles() -> TableSchema {
    TableSchema::new(
        "articles",
        vec![
            Column::text("name").key(),
            Column::text("description"),
            Column::text("parent_name"),
        ],
    )
    .relation(Relation::new("parent", "parent_name", "articles", "name"))
}

/// Publishers keyed by name.
pub fn publishers() -> TableSchema {
    TableSchema::new("publishers", vec![Column::text("name").key()])
}

/// Authors linked to one article and one publisher.
pub fn authors() -> TableSchema {
    TableSchema::new(
        "authors",
        vec![
            Column::text("name").key(),
            Column::text("article_name"),
            Column::text("publisher_name"),
        ],
    )
    .relation(Relation::new("article", "article_name", "articles", "name"))
    .relation(Relation::new(
        "publisher",
        "publisher_name",
        "publishers",
        "name",
    ))
}

/// Creates an article in the tree fixture.
pub fn create_tree_article(
    adapter: &Adapter,
    schema: &TableSchema,
    name: &str,
    description: Option<&str>,
    parent: Option<&str>,
) {
    let record = vec![
        ("name".to_string(), Value::from(name)),
        ("description".to_string(), Value::from(description)),
        ("parent_name".to_string(), Value::from(parent)),
    ];
    adapter.create(schema, &record).unwrap();
}

/// Seeds the chained-parent fixture: five articles, each the parent of
/// the next, the first with no parent.
pub fn seed_parent_chain(adapter: &Adapter, schema: &TableSchema) {
    let mut last: Option<String> = None;
    for index in 0..5 {
        let name = format!("Test {}", index);
        create_tree_article(adapter, schema, &name, None, last.as_deref());
        last = Some(name);
    }
}
