//! Raw select/execute result shapes.

use ntest::timeout;
use sql_adapter_core::{SelectResult, Value};

use super::helpers::{keyed_articles, memory_adapter, serial_articles};

fn seeded_adapter() -> sql_adapter_core::Adapter {
    let schema = keyed_articles();
    let adapter = memory_adapter("ansi", &[schema.clone()]);
    adapter
        .create(
            &schema,
            &[
                ("name".to_string(), Value::from("Learning SQL")),
                ("author".to_string(), Value::from("Dan")),
            ],
        )
        .unwrap();
    adapter
}

#[test]
fn test_select_with_one_field_returns_scalar_values() {
    let adapter = seeded_adapter();

    let result = adapter.select("SELECT name FROM articles", &[]).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result,
        SelectResult::Column(vec![Value::from("Learning SQL")])
    );
}

#[test]
fn test_select_with_two_fields_returns_rows_in_request_order() {
    let adapter = seeded_adapter();

    let result = adapter
        .select("SELECT name, author FROM articles", &[])
        .unwrap();
    assert_eq!(result.len(), 1);

    let rows = result.into_rows().unwrap();
    assert_eq!(
        rows[0].values(),
        vec![&Value::from("Learning SQL"), &Value::from("Dan")]
    );

    // Reversed projection reverses the row's field order
    let adapter = seeded_adapter();
    let result = adapter
        .select("SELECT author, name FROM articles", &[])
        .unwrap();
    let rows = result.into_rows().unwrap();
    assert_eq!(
        rows[0].fields()[0],
        ("author".to_string(), Value::from("Dan"))
    );
}

#[test]
fn test_execute_insert_affects_one_row_without_insert_id() {
    let schema = keyed_articles();
    let adapter = memory_adapter("ansi", &[schema]);

    let result = adapter
        .execute(
            "INSERT INTO articles (name, author) VALUES(?, ?)",
            &[Value::from("Learning SQL"), Value::from("Dan")],
        )
        .unwrap();

    assert_eq!(result.affected_rows, 1);
    assert_eq!(result.insert_id, None);
}

#[test]
fn test_execute_reports_insert_id_where_the_dialect_supports_it() {
    let schema = serial_articles();

    let adapter = memory_adapter("mysql", &[schema.clone()]);
    let result = adapter
        .execute("INSERT INTO `articles` () VALUES ()", &[])
        .unwrap();
    assert_eq!(result.insert_id, Some(1));

    // Same statement shape through a dialect without insert ids
    let adapter = memory_adapter("ansi", &[schema]);
    let result = adapter
        .execute("INSERT INTO \"articles\" () VALUES ()", &[])
        .unwrap();
    assert_eq!(result.insert_id, None);
}

#[test]
fn test_execute_bind_mismatch_raises_before_execution() {
    let schema = keyed_articles();
    let adapter = memory_adapter("ansi", &[schema]);

    let err = adapter
        .execute(
            "INSERT INTO articles (name, author) VALUES(?, ?)",
            &[Value::from("only one")],
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Binding mismatch: 1 for 2");
    assert!(adapter.log().is_empty());
}

#[test]
#[timeout(2000)]
fn test_many_rows_round_trip_in_order() {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let schema = serial_articles();
    let adapter = memory_adapter("ansi", &[schema]);

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut ids: Vec<i64> = (1..=200).collect();
    ids.shuffle(&mut rng);

    for id in &ids {
        adapter
            .execute(
                "INSERT INTO \"articles\" (\"id\") VALUES (?)",
                &[Value::Integer(*id)],
            )
            .unwrap();
    }

    let result = adapter
        .select(
            "SELECT \"id\" FROM \"articles\" ORDER BY \"id\" ASC LIMIT 5",
            &[],
        )
        .unwrap();
    let values = result.into_column().unwrap();
    assert_eq!(
        values,
        (1..=5).map(Value::Integer).collect::<Vec<_>>()
    );
}
