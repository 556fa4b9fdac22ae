//! SQLite driver adapter.
//!
//! Implements the `DriverConnection` capability interface for SQLite
//! databases using sqlx.

use crate::driver::types::{Row, Value};
use crate::driver::{ConnectSpec, DriverConnection};
use crate::error::{Result, UnidbError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::str::FromStr;

/// SQLite adapter. Holds a single-connection pool so the file (or the
/// in-memory database) is owned by exactly one live connection.
#[derive(Debug)]
pub struct SqliteDriver {
    pool: SqlitePool,
}

impl SqliteDriver {
    /// Opens the database file named by the connection string.
    pub async fn connect(spec: &ConnectSpec) -> Result<Self> {
        let url = match spec {
            ConnectSpec::Url(url) => url.as_str(),
            ConnectSpec::Parts { .. } => {
                return Err(UnidbError::connection(
                    "sqlite connects with a connection string, not positional arguments",
                ))
            }
        };

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| UnidbError::connection(format!("invalid sqlite path {url}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| UnidbError::connection(format!("cannot open {url}: {e}")))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DriverConnection for SqliteDriver {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<i64> {
        let query = bind_args(sqlx::query(sql), args);
        let outcome = query
            .execute(&self.pool)
            .await
            .map_err(|e| UnidbError::driver(e.to_string()))?;
        Ok(outcome.rows_affected() as i64)
    }

    async fn fetch_all(&self, sql: &str, args: &[Value]) -> Result<(Vec<String>, Vec<Row>)> {
        let query = bind_args(sqlx::query(sql), args);
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UnidbError::driver(e.to_string()))?;

        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows.iter().map(convert_row).collect();
        Ok((columns, rows))
    }

    async fn commit(&self) -> Result<()> {
        // sqlx runs SQLite in autocommit mode; each statement is durable
        // as soon as execute returns.
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn bind_args<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    args: &[Value],
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Int(i) => query.bind(*i),
            Value::Float(f) => query.bind(*f),
            Value::String(s) => query.bind(s.clone()),
            Value::Bytes(b) => query.bind(b.clone()),
        };
    }
    query
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a SqliteRow to our Value type.
fn convert_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" | "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INTEGER" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // TEXT and anything SQLite could not classify.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_driver() -> SqliteDriver {
        SqliteDriver::connect(&ConnectSpec::Url("sqlite::memory:".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_and_fetch() {
        let driver = memory_driver().await;
        driver
            .execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])
            .await
            .unwrap();
        let affected = driver
            .execute(
                "INSERT INTO t VALUES (?, ?)",
                &[Value::Int(1), Value::from("Drama")],
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let (columns, rows) = driver.fetch_all("SELECT * FROM t", &[]).await.unwrap();
        assert_eq!(columns, vec!["id", "name"]);
        assert_eq!(rows, vec![vec![Value::Int(1), Value::from("Drama")]]);
        driver.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_empty_result_has_no_metadata() {
        let driver = memory_driver().await;
        driver.execute("CREATE TABLE t (id INTEGER)", &[]).await.unwrap();
        let (columns, rows) = driver.fetch_all("SELECT * FROM t", &[]).await.unwrap();
        assert!(columns.is_empty());
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_null_round_trip() {
        let driver = memory_driver().await;
        driver.execute("CREATE TABLE t (x TEXT)", &[]).await.unwrap();
        driver
            .execute("INSERT INTO t VALUES (?)", &[Value::Null])
            .await
            .unwrap();
        let (_, rows) = driver.fetch_all("SELECT x FROM t", &[]).await.unwrap();
        assert_eq!(rows, vec![vec![Value::Null]]);
    }

    #[tokio::test]
    async fn test_execute_error_is_driver_failure() {
        let driver = memory_driver().await;
        let err = driver.execute("INSERT INTO missing VALUES (1)", &[]).await;
        assert!(matches!(err, Err(UnidbError::DriverExecution(_))));
    }
}
