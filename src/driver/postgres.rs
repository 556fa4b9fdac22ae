//! PostgreSQL driver adapter.
//!
//! Implements the `DriverConnection` capability interface for PostgreSQL
//! using sqlx. Incoming SQL uses `?` placeholders after parameter-style
//! normalization; this adapter rewrites them to the `$n` form PostgreSQL
//! expects.

use crate::driver::types::{Row, Value};
use crate::driver::{ConnectSpec, DriverConnection};
use crate::error::{Result, UnidbError};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::time::Duration;

/// PostgreSQL adapter. A single-connection pool: the handle owns exactly
/// one live connection.
#[derive(Debug)]
pub struct PostgresDriver {
    pool: PgPool,
}

impl PostgresDriver {
    /// Connects using a `postgres://` connection string.
    pub async fn connect(spec: &ConnectSpec) -> Result<Self> {
        let url = match spec {
            ConnectSpec::Url(url) => url.as_str(),
            ConnectSpec::Parts { .. } => {
                return Err(UnidbError::connection(
                    "postgresql connects with a connection string, not positional arguments",
                ))
            }
        };

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|e| UnidbError::connection(map_connect_error(&e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DriverConnection for PostgresDriver {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<i64> {
        let sql = numbered_placeholders(sql);
        let query = bind_args(sqlx::query(&sql), args);
        let outcome = query
            .execute(&self.pool)
            .await
            .map_err(|e| UnidbError::driver(e.to_string()))?;
        Ok(outcome.rows_affected() as i64)
    }

    async fn fetch_all(&self, sql: &str, args: &[Value]) -> Result<(Vec<String>, Vec<Row>)> {
        let sql = numbered_placeholders(sql);
        let query = bind_args(sqlx::query(&sql), args);
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

/// Rewrites `?` placeholders to `$1..$n`, skipping quoted literals.
fn numbered_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 4);
    let mut n = 0;
    let mut in_string = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                out.push(ch);
            }
            '?' if !in_string => {
                n += 1;
                out.push('$');
                out.push_str(&n.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

fn bind_args<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    args: &[Value],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
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

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INT2" | "SMALLINT" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "INT4" | "INT" | "INTEGER" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "FLOAT4" | "REAL" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "FLOAT8" | "DOUBLE PRECISION" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BYTEA" => row
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

/// Trims sqlx connection errors down to the part worth showing.
fn map_connect_error(error: &sqlx::Error) -> String {
    let text = error.to_string();
    if text.to_lowercase().contains("password authentication failed") {
        "authentication failed, check your credentials".to_string()
    } else {
        text
    }
}
