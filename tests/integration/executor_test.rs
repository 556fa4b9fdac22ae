//! Statement execution integration tests.
//!
//! Exercises the executor end to end over a live SQLite connection:
//! classification, bind normalization, commit behavior, and the shape of
//! results.

use super::memory_handle;
use pretty_assertions::assert_eq;
use unidb::driver::Value;
use unidb::error::UnidbError;
use unidb::executor::{BindParams, FailurePolicy, StatementExecutor};

fn named(pairs: &[(&str, Value)]) -> BindParams {
    BindParams::Named(
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect(),
    )
}

#[tokio::test]
async fn test_create_insert_select_round_trip() {
    let handle = memory_handle().await;
    let executor = StatementExecutor::new();

    let result = executor
        .run(
            &handle,
            "CREATE TABLE categories (id INTEGER PRIMARY KEY, name VARCHAR(20) NOT NULL)",
            &BindParams::None,
        )
        .await
        .unwrap();
    assert!(!result.is_query());

    let result = executor
        .run(
            &handle,
            "INSERT INTO categories (id, name) VALUES (:id, :name)",
            &named(&[("id", Value::Int(1)), ("name", Value::from("Drama"))]),
        )
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.columns, None);
    assert_eq!(result.rows, None);

    let result = executor
        .run(
            &handle,
            "SELECT id, name FROM categories WHERE name = :name",
            &named(&[("name", Value::from("Drama"))]),
        )
        .await
        .unwrap();
    assert_eq!(result.columns, Some(vec!["id".to_string(), "name".to_string()]));
    assert_eq!(
        result.rows,
        Some(vec![vec![Value::Int(1), Value::from("Drama")]])
    );
    assert_eq!(result.count, 1);
}

#[tokio::test]
async fn test_select_count_is_row_count_not_driver_count() {
    let handle = memory_handle().await;
    let executor = StatementExecutor::new();

    executor
        .run(
            &handle,
            "CREATE TABLE t (n INTEGER)",
            &BindParams::None,
        )
        .await
        .unwrap();
    for n in 0..5 {
        executor
            .run(
                &handle,
                "INSERT INTO t (n) VALUES (:n)",
                &named(&[("n", Value::Int(n))]),
            )
            .await
            .unwrap();
    }

    let result = executor
        .run(&handle, "SELECT n FROM t WHERE n < :limit", &named(&[("limit", Value::Int(3))]))
        .await
        .unwrap();
    assert_eq!(result.count, 3);
    assert_eq!(result.rows.as_ref().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_and_delete_report_affected_rows() {
    let handle = memory_handle().await;
    let executor = StatementExecutor::new();

    executor
        .run(&handle, "CREATE TABLE t (n INTEGER)", &BindParams::None)
        .await
        .unwrap();
    executor
        .run(
            &handle,
            "INSERT INTO t (n) VALUES (1), (2), (3)",
            &BindParams::None,
        )
        .await
        .unwrap();

    let result = executor
        .run(&handle, "UPDATE t SET n = n + 10 WHERE n > 1", &BindParams::None)
        .await
        .unwrap();
    assert_eq!(result.count, 2);

    let result = executor
        .run(&handle, "DELETE FROM t", &BindParams::None)
        .await
        .unwrap();
    assert_eq!(result.count, 3);
}

#[tokio::test]
async fn test_zero_row_select_has_no_column_metadata() {
    let handle = memory_handle().await;
    let executor = StatementExecutor::new();

    executor
        .run(&handle, "CREATE TABLE t (n INTEGER)", &BindParams::None)
        .await
        .unwrap();
    let result = executor
        .run(&handle, "SELECT n FROM t", &BindParams::None)
        .await
        .unwrap();

    // Column names are only available once at least one row comes back.
    assert_eq!(result.columns, Some(Vec::new()));
    assert_eq!(result.rows, Some(Vec::new()));
    assert_eq!(result.count, 0);
}

#[tokio::test]
async fn test_null_round_trip() {
    let handle = memory_handle().await;
    let executor = StatementExecutor::new();

    executor
        .run(&handle, "CREATE TABLE t (a TEXT, b TEXT)", &BindParams::None)
        .await
        .unwrap();
    executor
        .run(
            &handle,
            "INSERT INTO t (a, b) VALUES (:a, :b)",
            &named(&[("a", Value::from("x")), ("b", Value::Null)]),
        )
        .await
        .unwrap();

    let result = executor
        .run(&handle, "SELECT a, b FROM t", &BindParams::None)
        .await
        .unwrap();
    let rows = result.rows.unwrap();
    assert_eq!(rows[0][0], Value::from("x"));
    assert!(rows[0][1].is_null());
}

#[tokio::test]
async fn test_empty_statement_is_rejected() {
    let handle = memory_handle().await;
    let err = StatementExecutor::new()
        .run(&handle, "", &BindParams::None)
        .await
        .unwrap_err();
    assert!(matches!(err, UnidbError::EmptyStatement));
}

#[tokio::test]
async fn test_degrade_survives_bad_sql() {
    let handle = memory_handle().await;
    let result = StatementExecutor::new()
        .run(&handle, "SELECT * FROM no_such_table", &BindParams::None)
        .await
        .unwrap();
    assert_eq!(result.count, 0);
    assert!(!result.is_query());

    // The connection is still usable afterwards.
    let result = StatementExecutor::new()
        .run(&handle, "CREATE TABLE t (n INTEGER)", &BindParams::None)
        .await
        .unwrap();
    assert!(!result.is_query());
}

#[tokio::test]
async fn test_strict_policy_surfaces_bad_sql() {
    let handle = memory_handle().await;
    let err = StatementExecutor::with_policy(FailurePolicy::Propagate)
        .run(&handle, "SELECT * FROM no_such_table", &BindParams::None)
        .await
        .unwrap_err();
    assert!(matches!(err, UnidbError::DriverExecution(_)));
}

#[tokio::test]
async fn test_mismatched_bind_shape_is_caller_error() {
    let handle = memory_handle().await;
    let err = StatementExecutor::new()
        .run(
            &handle,
            "SELECT :a",
            &BindParams::Positional(vec![Value::Int(1)]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UnidbError::BindShapeMismatch(_)));
}
