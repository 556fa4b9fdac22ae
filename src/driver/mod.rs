//! Driver adapter layer for unidb.
//!
//! Provides a trait-based capability interface for engine drivers, so
//! the rest of the crate talks to every engine through the same four
//! operations: execute, fetch, commit, close. One engine id maps to one
//! concrete adapter, resolved at compile time in `connect` (no runtime
//! reflection or import-by-name).

pub mod mock;
mod mysql;
mod postgres;
mod sqlite;
mod types;

pub use mock::{FailingDriver, MockDriver};
pub use mysql::MysqlDriver;
pub use postgres::PostgresDriver;
pub use sqlite::SqliteDriver;
pub use types::{Row, Value};

use crate::catalog::{Engine, EngineProfile};
use crate::error::{Result, UnidbError};
use async_trait::async_trait;

/// How to reach an instance, as built by `InstanceHandle::connect`.
///
/// Engines split statically into "connection string" and "positional
/// arguments"; the adapters consume either form.
#[derive(Debug, Clone)]
pub enum ConnectSpec {
    /// A single engine-specific connection string / URL.
    Url(String),
    /// Positional connect arguments (host, username, password, instance,
    /// port), the MySQL convention.
    Parts {
        host: String,
        username: String,
        password: String,
        instance: String,
        port: u16,
    },
}

/// Capability interface every engine adapter implements.
///
/// All operations are blocking round trips from the caller's point of
/// view; there is no concurrent dispatch within one connection.
#[async_trait]
pub trait DriverConnection: Send + Sync + std::fmt::Debug {
    /// Executes a statement that returns no result set.
    ///
    /// Returns the driver-reported affected-row count, which several
    /// engines report unreliably for anything but plain DML.
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<i64>;

    /// Executes a statement and fetches the entire result set in one
    /// call, returning (column names, rows).
    ///
    /// An empty result set yields an empty column list as well; callers
    /// must not rely on metadata for zero-row selects.
    async fn fetch_all(&self, sql: &str, args: &[Value]) -> Result<(Vec<String>, Vec<Row>)>;

    /// Explicit commit. Adapters running in autocommit mode treat this
    /// as a successful no-op.
    async fn commit(&self) -> Result<()>;

    /// Closes the underlying connection.
    async fn close(&self) -> Result<()>;
}

// Lets tests hand a handle its adapter while keeping a reference to it.
#[async_trait]
impl<T: DriverConnection + ?Sized> DriverConnection for std::sync::Arc<T> {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<i64> {
        (**self).execute(sql, args).await
    }

    async fn fetch_all(&self, sql: &str, args: &[Value]) -> Result<(Vec<String>, Vec<Row>)> {
        (**self).fetch_all(sql, args).await
    }

    async fn commit(&self) -> Result<()> {
        (**self).commit().await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

/// Opens the adapter for the profile's engine.
///
/// Engines without a compiled-in adapter (Oracle, SQL Server, Access)
/// fail with `ConnectionError` naming the adapter they would need; their
/// catalog entries stay usable without a live connection.
pub async fn connect(
    profile: &'static EngineProfile,
    spec: &ConnectSpec,
) -> Result<Box<dyn DriverConnection>> {
    match profile.engine {
        Engine::Sqlite => {
            let driver = SqliteDriver::connect(spec).await?;
            Ok(Box::new(driver))
        }
        Engine::Postgres => {
            let driver = PostgresDriver::connect(spec).await?;
            Ok(Box::new(driver))
        }
        Engine::Mysql => {
            let driver = MysqlDriver::connect(spec).await?;
            Ok(Box::new(driver))
        }
        Engine::Oracle | Engine::SqlServer | Engine::Access => Err(UnidbError::connection(format!(
            "no driver adapter compiled in for {} (requires \"{}\")",
            profile.engine, profile.driver_name
        ))),
    }
}
