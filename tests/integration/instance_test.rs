//! Instance handle integration tests.
//!
//! Connection lifecycle, version probing, and cursor bookkeeping over a
//! real SQLite connection.

use super::memory_handle;
use unidb::catalog::Engine;
use unidb::driver::Value;
use unidb::error::UnidbError;
use unidb::executor::{BindParams, StatementExecutor};
use unidb::instance::{ConnectionTarget, Credentials, InstanceHandle};

#[tokio::test]
async fn test_connect_probes_server_version() {
    let handle = memory_handle().await;
    assert_eq!(handle.engine(), Engine::Sqlite);
    // A real version like "3.45.0", not the degradation sentinel.
    assert_ne!(handle.server_version(), "unknown");
    assert!(handle.server_version().starts_with('3'));
}

#[tokio::test]
async fn test_connect_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.sqlite3");
    let mut handle = InstanceHandle::connect(
        Engine::Sqlite,
        ConnectionTarget::File { path: path.clone() },
        Credentials::default(),
    )
    .await
    .unwrap();

    StatementExecutor::new()
        .run(&handle, "CREATE TABLE t (n INTEGER)", &BindParams::None)
        .await
        .unwrap();
    handle.close(false).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_data_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persist.sqlite3");
    let target = ConnectionTarget::File { path };
    let executor = StatementExecutor::new();

    let mut handle =
        InstanceHandle::connect(Engine::Sqlite, target.clone(), Credentials::default())
            .await
            .unwrap();
    executor
        .run(&handle, "CREATE TABLE t (n INTEGER)", &BindParams::None)
        .await
        .unwrap();
    executor
        .run(&handle, "INSERT INTO t (n) VALUES (7)", &BindParams::None)
        .await
        .unwrap();
    handle.close(false).await.unwrap();

    let mut handle = InstanceHandle::connect(Engine::Sqlite, target, Credentials::default())
        .await
        .unwrap();
    let result = executor
        .run(&handle, "SELECT n FROM t", &BindParams::None)
        .await
        .unwrap();
    assert_eq!(result.rows, Some(vec![vec![Value::Int(7)]]));
    handle.close(false).await.unwrap();
}

#[tokio::test]
async fn test_cursor_lifecycle_against_live_connection() {
    let mut handle = memory_handle().await;

    let reporter = handle.create_cursor("reporter").unwrap();
    let loader = handle.create_cursor("loader").unwrap();
    assert_eq!(handle.open_cursor_count(), 2);

    // One cursor per owner.
    let err = handle.create_cursor("reporter").unwrap_err();
    assert!(matches!(err, UnidbError::CursorConflict(_)));

    // Non-forced close refuses while cursors are open.
    let err = handle.close(false).await.unwrap_err();
    assert!(matches!(err, UnidbError::DependentCursorsExist(2)));

    handle.release_cursor(reporter.owner()).unwrap();
    handle.release_cursor(loader.owner()).unwrap();
    handle.close(false).await.unwrap();
}

#[tokio::test]
async fn test_forced_close_cascades_cursor_release() {
    let mut handle = memory_handle().await;
    handle.create_cursor("a").unwrap();
    handle.create_cursor("b").unwrap();

    handle.close(true).await.unwrap();
    assert_eq!(handle.open_cursor_count(), 0);
}

#[tokio::test]
async fn test_release_unknown_owner_fails() {
    let mut handle = memory_handle().await;
    let err = handle.release_cursor("nobody").unwrap_err();
    assert!(matches!(err, UnidbError::UnknownOwner(_)));
}
