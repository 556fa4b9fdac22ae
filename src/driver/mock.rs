//! Mock driver adapter for testing.
//!
//! Provides scripted in-memory adapters so the executor, instance, and
//! introspection layers can be exercised under any engine profile,
//! including engines with no compiled-in driver.

use crate::driver::types::{Row, Value};
use crate::driver::DriverConnection;
use crate::error::{Result, UnidbError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A mock adapter that returns predefined results and records every call.
#[derive(Debug, Default)]
pub struct MockDriver {
    columns: Vec<String>,
    rows: Vec<Row>,
    affected: i64,
    executed: Mutex<Vec<(String, Vec<Value>)>>,
    commits: AtomicUsize,
}

impl MockDriver {
    /// Creates a mock that returns empty results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose fetches return the given result set.
    pub fn with_result(columns: Vec<&str>, rows: Vec<Row>) -> Self {
        Self {
            columns: columns.into_iter().map(String::from).collect(),
            rows,
            ..Self::default()
        }
    }

    /// Sets the affected-row count reported by `execute`.
    pub fn with_affected(mut self, affected: i64) -> Self {
        self.affected = affected;
        self
    }

    /// Returns every (sql, args) pair executed so far.
    pub fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.executed.lock().expect("mock log poisoned").clone()
    }

    /// Returns how many commits were issued.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn record(&self, sql: &str, args: &[Value]) {
        self.executed
            .lock()
            .expect("mock log poisoned")
            .push((sql.to_string(), args.to_vec()));
    }
}

#[async_trait]
impl DriverConnection for MockDriver {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<i64> {
        self.record(sql, args);
        Ok(self.affected)
    }

    async fn fetch_all(&self, sql: &str, args: &[Value]) -> Result<(Vec<String>, Vec<Row>)> {
        self.record(sql, args);
        Ok((self.columns.clone(), self.rows.clone()))
    }

    async fn commit(&self) -> Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock adapter whose statement operations always fail, for exercising
/// the degrade-vs-propagate failure policies.
#[derive(Debug, Default)]
pub struct FailingDriver;

impl FailingDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DriverConnection for FailingDriver {
    async fn execute(&self, _sql: &str, _args: &[Value]) -> Result<i64> {
        Err(UnidbError::driver("simulated driver failure"))
    }

    async fn fetch_all(&self, _sql: &str, _args: &[Value]) -> Result<(Vec<String>, Vec<Row>)> {
        Err(UnidbError::driver("simulated driver failure"))
    }

    async fn commit(&self) -> Result<()> {
        Err(UnidbError::driver("simulated driver failure"))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
