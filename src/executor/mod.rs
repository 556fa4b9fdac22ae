//! Statement execution for unidb.
//!
//! Takes SQL text plus bind parameters in the engine's native style,
//! normalizes the placeholders, and runs the statement over an instance
//! handle's connection. Results come back in one uniform shape no matter
//! which engine produced them.

pub mod params;

pub use params::{normalize, BindParams};

use crate::driver::{Row, Value};
use crate::error::{Result, UnidbError};
use crate::instance::InstanceHandle;
use tracing::error;

/// Coarse statement classification, decided from the first keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Produces a result set; fetched in full.
    Select,
    /// INSERT, UPDATE, or DELETE; executed and committed.
    Dml,
    /// Everything else (DDL, pragmas, etc.); executed, no commit.
    Other,
}

impl StatementKind {
    /// Classifies trimmed SQL by its leading keyword.
    pub fn classify(sql: &str) -> Self {
        let first = sql
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_uppercase();
        match first.as_str() {
            "SELECT" => Self::Select,
            "INSERT" | "UPDATE" | "DELETE" => Self::Dml,
            _ => Self::Other,
        }
    }
}

/// What to do when the driver fails mid-statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and return an empty result. The session survives.
    #[default]
    Degrade,
    /// Surface the failure as `DriverExecution`.
    Propagate,
}

/// Outcome of one statement.
///
/// `columns` and `rows` are both `Some` for queries and both `None` for
/// non-queries. `count` is the fetched row count for queries and the
/// driver-reported affected count otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementResult {
    pub columns: Option<Vec<String>>,
    pub rows: Option<Vec<Row>>,
    pub count: i64,
}

impl StatementResult {
    fn query(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let count = rows.len() as i64;
        Self {
            columns: Some(columns),
            rows: Some(rows),
            count,
        }
    }

    fn non_query(count: i64) -> Self {
        Self {
            columns: None,
            rows: None,
            count,
        }
    }

    fn empty() -> Self {
        Self::non_query(0)
    }

    pub fn is_query(&self) -> bool {
        self.columns.is_some()
    }
}

/// Runs statements against an instance handle under a failure policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementExecutor {
    policy: FailurePolicy,
}

impl StatementExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Executes one statement.
    ///
    /// Caller errors (empty SQL, unsupported or mismatched binds) are
    /// always surfaced regardless of policy; only driver failures are
    /// subject to degrade.
    pub async fn run(
        &self,
        handle: &InstanceHandle,
        sql: &str,
        params: &BindParams,
    ) -> Result<StatementResult> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(UnidbError::EmptyStatement);
        }

        let profile = handle.profile();
        if !profile.supports_bind_vars && !params.is_empty() {
            return Err(UnidbError::BindVarsUnsupported(
                profile.engine.as_str().to_string(),
            ));
        }

        let (sql, args) = normalize(profile.parameter_style, sql, params)?;

        match StatementKind::classify(&sql) {
            StatementKind::Select => self.run_query(handle, &sql, &args).await,
            StatementKind::Dml => self.run_dml(handle, &sql, &args).await,
            StatementKind::Other => self.run_other(handle, &sql, &args).await,
        }
    }

    async fn run_query(
        &self,
        handle: &InstanceHandle,
        sql: &str,
        args: &[Value],
    ) -> Result<StatementResult> {
        match handle.connection().fetch_all(sql, args).await {
            // Row count comes from the fetched rows, never from whatever
            // the driver claims for a query.
            Ok((columns, rows)) => Ok(StatementResult::query(columns, rows)),
            Err(e) => self.degrade(e),
        }
    }

    async fn run_dml(
        &self,
        handle: &InstanceHandle,
        sql: &str,
        args: &[Value],
    ) -> Result<StatementResult> {
        let affected = match handle.connection().execute(sql, args).await {
            Ok(affected) => affected,
            Err(e) => return self.degrade(e),
        };
        if let Err(e) = handle.connection().commit().await {
            return self.degrade(e);
        }
        Ok(StatementResult::non_query(affected))
    }

    async fn run_other(
        &self,
        handle: &InstanceHandle,
        sql: &str,
        args: &[Value],
    ) -> Result<StatementResult> {
        match handle.connection().execute(sql, args).await {
            Ok(affected) => Ok(StatementResult::non_query(affected)),
            Err(e) => self.degrade(e),
        }
    }

    fn degrade(&self, e: UnidbError) -> Result<StatementResult> {
        match self.policy {
            FailurePolicy::Propagate => Err(e),
            FailurePolicy::Degrade => {
                error!("statement failed: {e}");
                Ok(StatementResult::empty())
            }
        }
    }
}
