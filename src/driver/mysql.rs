//! MySQL driver adapter.
//!
//! Implements the `DriverConnection` capability interface for MySQL
//! using sqlx. MySQL is the one engine connected from positional
//! arguments rather than a caller-supplied connection string; the URL is
//! assembled here.

use crate::driver::types::{Row, Value};
use crate::driver::{ConnectSpec, DriverConnection};
use crate::error::{Result, UnidbError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::time::Duration;

/// MySQL adapter. A single-connection pool: the handle owns exactly one
/// live connection.
#[derive(Debug)]
pub struct MysqlDriver {
    pool: MySqlPool,
}

impl MysqlDriver {
    /// Connects from positional arguments (host, username, password,
    /// instance, port).
    pub async fn connect(spec: &ConnectSpec) -> Result<Self> {
        let url = match spec {
            ConnectSpec::Parts {
                host,
                username,
                password,
                instance,
                port,
            } => format!("mysql://{username}:{password}@{host}:{port}/{instance}"),
            ConnectSpec::Url(_) => {
                return Err(UnidbError::connection(
                    "mysql connects with positional arguments, not a connection string",
                ))
            }
        };

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&url)
            .await
            .map_err(|e| UnidbError::connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DriverConnection for MysqlDriver {
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
        // Statements run in autocommit mode; nothing is left pending.
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn bind_args<'q>(
    mut query: sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>,
    args: &[Value],
) -> sqlx::query::Query<'q, sqlx::MySql, MySqlArguments> {
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

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "FLOAT" | "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "VARBINARY" | "BINARY" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // For all other types, try to get as string.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
