//! Schema introspection integration tests.
//!
//! Builds a small schema in SQLite and walks it through the
//! introspector.

use super::memory_handle;
use pretty_assertions::assert_eq;
use unidb::executor::{BindParams, StatementExecutor};
use unidb::instance::InstanceHandle;
use unidb::introspect::SchemaIntrospector;
use unidb::typemap::{classify, DataTypeGroup};

async fn seed_schema(handle: &InstanceHandle) {
    let executor = StatementExecutor::new();
    let statements = [
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, name VARCHAR(20) NOT NULL)",
        "CREATE TABLE movies (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            category_id INTEGER,
            rating REAL DEFAULT 0.0
        )",
        "CREATE UNIQUE INDEX ix_movies_title ON movies (title)",
        "CREATE INDEX ix_movies_category ON movies (category_id DESC)",
        "CREATE VIEW v_rated AS SELECT title, rating FROM movies WHERE rating > 0",
    ];
    for sql in statements {
        executor.run(handle, sql, &BindParams::None).await.unwrap();
    }
}

#[tokio::test]
async fn test_find_tables_sorted_and_idempotent() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;
    let introspector = SchemaIntrospector::new();

    let first = introspector.find_tables(&handle).await.unwrap();
    assert_eq!(first, vec!["categories", "movies"]);

    // Introspection never mutates the catalog.
    let second = introspector.find_tables(&handle).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_find_views_carries_definition() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let views = SchemaIntrospector::new().find_views(&handle).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, "v_rated");
    let definition = views[0].definition.as_deref().unwrap();
    assert!(definition.contains("SELECT title, rating FROM movies"));
}

#[tokio::test]
async fn test_find_columns_describes_table() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let columns = SchemaIntrospector::new()
        .find_columns(&handle, "movies")
        .await
        .unwrap();
    assert_eq!(columns.len(), 4);

    // No default and no comment column both surface as the "(null)"
    // sentinel, never as an empty cell.
    let title = &columns[1];
    assert_eq!(title.name, "title");
    assert_eq!(title.rendered_type, "TEXT");
    assert!(!title.nullable);
    assert_eq!(title.default_value, "(null)");
    assert_eq!(title.comment, "(null)");

    let category = &columns[2];
    assert_eq!(category.name, "category_id");
    assert!(category.nullable);

    let rating = &columns[3];
    assert_eq!(rating.name, "rating");
    assert_eq!(rating.default_value, "0.0");

    // Rendered types classify into the expected groups.
    let engine = handle.engine();
    assert_eq!(classify(engine, &title.rendered_type), DataTypeGroup::String);
    assert_eq!(classify(engine, &rating.rendered_type), DataTypeGroup::Number);
}

#[tokio::test]
async fn test_find_view_columns() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let columns = SchemaIntrospector::new()
        .find_view_columns(&handle, "v_rated")
        .await
        .unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["title", "rating"]);
}

#[tokio::test]
async fn test_find_indexes_reports_uniqueness() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let indexes = SchemaIntrospector::new()
        .find_indexes(&handle, "movies")
        .await
        .unwrap();
    let by_name: Vec<(&str, bool)> = indexes
        .iter()
        .map(|ix| (ix.name.as_str(), ix.unique))
        .collect();
    assert!(by_name.contains(&("ix_movies_title", true)));
    assert!(by_name.contains(&("ix_movies_category", false)));
}

#[tokio::test]
async fn test_find_index_columns() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let columns = SchemaIntrospector::new()
        .find_index_columns(&handle, "ix_movies_title")
        .await
        .unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name, "title");
    assert_eq!(columns[0].expression, None);
}

#[tokio::test]
async fn test_table_report_assembles_index_columns() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let report = SchemaIntrospector::new()
        .table_report(&handle, "movies")
        .await
        .unwrap();
    assert_eq!(report.table_name, "movies");
    assert_eq!(report.columns.len(), 4);
    assert_eq!(report.indexes.len(), 2);

    let title_index = report
        .indexes
        .iter()
        .find(|ix| ix.info.name == "ix_movies_title")
        .unwrap();
    assert_eq!(title_index.columns_display, "(title ASC)");
}

#[tokio::test]
async fn test_view_report() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;

    let report = SchemaIntrospector::new()
        .view_report(&handle, "v_rated")
        .await
        .unwrap();
    assert_eq!(report.view_name, "v_rated");
    assert!(report.definition.is_some());
    assert_eq!(report.columns.len(), 2);
}

#[tokio::test]
async fn test_data_type_of_classifies_by_column() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;
    let introspector = SchemaIntrospector::new();

    let group = introspector
        .data_type_of(&handle, "movies", "title")
        .await
        .unwrap();
    assert_eq!(group, Some(DataTypeGroup::String));

    let group = introspector
        .data_type_of(&handle, "movies", "rating")
        .await
        .unwrap();
    assert_eq!(group, Some(DataTypeGroup::Number));

    let group = introspector
        .data_type_of(&handle, "movies", "no_such_column")
        .await
        .unwrap();
    assert_eq!(group, None);
}

#[tokio::test]
async fn test_unknown_table_yields_empty_descriptions() {
    let handle = memory_handle().await;
    seed_schema(&handle).await;
    let introspector = SchemaIntrospector::new();

    let columns = introspector.find_columns(&handle, "nope").await.unwrap();
    assert!(columns.is_empty());
    let indexes = introspector.find_indexes(&handle, "nope").await.unwrap();
    assert!(indexes.is_empty());
}
