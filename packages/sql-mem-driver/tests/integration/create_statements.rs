//! Emitted INSERT statements per dialect, observed through the statement log.

use sql_adapter_core::Value;

use super::helpers::{memory_adapter, serial_articles, titled_articles};

#[test]
fn test_all_default_insert_does_not_send_null_values() {
    let schema = serial_articles();

    let cases = [
        ("mysql", "INSERT INTO `articles` () VALUES ()"),
        (
            "oracle",
            "INSERT INTO \"ARTICLES\" (\"ID\") VALUES (DEFAULT) RETURNING \"ID\"",
        ),
        (
            "postgres",
            "INSERT INTO \"articles\" DEFAULT VALUES RETURNING \"id\"",
        ),
        ("sqlserver", "INSERT INTO [articles] DEFAULT VALUES"),
        ("ansi", "INSERT INTO \"articles\" DEFAULT VALUES"),
    ];

    for (dialect, expected) in cases {
        let adapter = memory_adapter(dialect, &[schema.clone()]);
        adapter.create(&schema, &[]).unwrap();
        assert_eq!(
            adapter.log().statements(),
            vec![expected],
            "unexpected statement for {}",
            dialect
        );
    }
}

#[test]
fn test_generated_key_is_reported_per_dialect_capability() {
    let schema = serial_articles();

    // RETURNING dialects fetch the key from the insert itself
    for dialect in ["postgres", "oracle"] {
        let adapter = memory_adapter(dialect, &[schema.clone()]);
        let key = adapter.create(&schema, &[]).unwrap();
        assert_eq!(key, Some(Value::Integer(1)), "dialect {}", dialect);
    }

    // MySQL reports it through the insert id
    let adapter = memory_adapter("mysql", &[schema.clone()]);
    let key = adapter.create(&schema, &[]).unwrap();
    assert_eq!(key, Some(Value::Integer(1)));

    // Dialects with neither mechanism report nothing
    for dialect in ["ansi", "sqlserver"] {
        let adapter = memory_adapter(dialect, &[schema.clone()]);
        let key = adapter.create(&schema, &[]).unwrap();
        assert_eq!(key, None, "dialect {}", dialect);
    }
}

#[test]
fn test_partial_record_sends_only_specified_fields() {
    let schema = titled_articles();
    let record = vec![
        ("id".to_string(), Value::Integer(1)),
        ("title".to_string(), Value::Null),
    ];

    let cases = [
        ("mysql", "INSERT INTO `articles` (`id`) VALUES (?)"),
        (
            "sqlserver",
            "SET IDENTITY_INSERT [articles] ON \
             INSERT INTO [articles] ([id]) VALUES (?) \
             SET IDENTITY_INSERT [articles] OFF",
        ),
        ("ansi", "INSERT INTO \"articles\" (\"id\") VALUES (?)"),
        ("postgres", "INSERT INTO \"articles\" (\"id\") VALUES (?)"),
        ("oracle", "INSERT INTO \"ARTICLES\" (\"ID\") VALUES (?)"),
    ];

    for (dialect, expected) in cases {
        let adapter = memory_adapter(dialect, &[schema.clone()]);
        let key = adapter.create(&schema, &record).unwrap();
        assert_eq!(
            adapter.log().statements(),
            vec![expected],
            "unexpected statement for {}",
            dialect
        );
        // The explicit key is echoed back
        assert_eq!(key, Some(Value::Integer(1)), "dialect {}", dialect);
    }
}

#[test]
fn test_created_rows_are_visible_to_reads() {
    let schema = titled_articles();
    let adapter = memory_adapter("postgres", &[schema.clone()]);

    adapter.create(&schema, &[]).unwrap();
    adapter
        .create(&schema, &[("title".to_string(), Value::from("second"))])
        .unwrap();

    let result = adapter
        .select("SELECT \"id\" FROM \"articles\"", &[])
        .unwrap();
    assert_eq!(
        result.into_column().unwrap(),
        vec![Value::Integer(1), Value::Integer(2)]
    );
}
