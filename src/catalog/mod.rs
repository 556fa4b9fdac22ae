//! Engine catalog for unidb.
//!
//! Static registry describing every supported database engine: its bind
//! parameter style, driver adapter, native CLI client, and version-probe
//! SQL. Loaded once, never mutated; everything here is process-lifetime
//! data resolved by a single lookup instead of per-call branching.

mod bridge;
mod queries;

pub use bridge::{client_invocation, ClientInvocation};
pub use queries::{skip_reason, template_for, CatalogQuery, SchemaObjectKind};

use crate::error::{Result, UnidbError};
use serde::{Deserialize, Serialize};

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Access,
    Mysql,
    Oracle,
    Postgres,
    Sqlite,
    SqlServer,
}

impl Engine {
    /// All supported engines, in catalog order.
    pub const ALL: [Engine; 6] = [
        Engine::Access,
        Engine::Mysql,
        Engine::Oracle,
        Engine::Postgres,
        Engine::Sqlite,
        Engine::SqlServer,
    ];

    /// Returns the engine as a string for display and persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::Postgres => "postgresql",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sql server",
        }
    }

    /// Parses an engine from a string.
    ///
    /// Fails with `UnknownEngine` for anything outside the fixed set.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "access" => Ok(Self::Access),
            "mysql" => Ok(Self::Mysql),
            "oracle" => Ok(Self::Oracle),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "sqlserver" | "sql server" | "mssql" => Ok(Self::SqlServer),
            other => Err(UnidbError::UnknownEngine(other.to_string())),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bind-placeholder syntax a driver expects in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStyle {
    /// `:name` placeholders, values passed by name.
    Named,
    /// `?` placeholders, values passed positionally.
    Qmark,
    /// `%(name)s` placeholders, values passed by name.
    Pyformat,
    /// No placeholders at all; SQL must be literal-only.
    None,
}

impl ParameterStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Named => "named",
            Self::Qmark => "qmark",
            Self::Pyformat => "pyformat",
            Self::None => "none",
        }
    }
}

/// Static description of one engine's conventions.
#[derive(Debug, Clone, Copy)]
pub struct EngineProfile {
    pub engine: Engine,
    pub parameter_style: ParameterStyle,
    /// Name of the driver adapter this engine needs.
    pub driver_name: &'static str,
    /// Native command-line client executable, or "" if the engine has none.
    pub cli_executable: &'static str,
    pub supports_bind_vars: bool,
    pub is_file_based: bool,
    /// Whether connect builds a single connection string (vs. positional
    /// host/user/password/instance/port arguments). Static per engine.
    pub uses_connection_string: bool,
    /// SQL that returns the server version as the first column of the
    /// first row, or None when the engine has no version query.
    pub version_probe: Option<&'static str>,
    pub default_port: Option<u16>,
}

static PROFILES: [EngineProfile; 6] = [
    EngineProfile {
        engine: Engine::Access,
        // pyodbc would be qmark, but Access rejects binds outright.
        parameter_style: ParameterStyle::None,
        driver_name: "odbc",
        cli_executable: "",
        supports_bind_vars: false,
        is_file_based: true,
        uses_connection_string: true,
        version_probe: None,
        default_port: None,
    },
    EngineProfile {
        engine: Engine::Mysql,
        parameter_style: ParameterStyle::Pyformat,
        driver_name: "sqlx-mysql",
        cli_executable: "mysqlsh",
        supports_bind_vars: true,
        is_file_based: false,
        uses_connection_string: false,
        version_probe: Some("SELECT version()"),
        default_port: Some(3306),
    },
    EngineProfile {
        engine: Engine::Oracle,
        parameter_style: ParameterStyle::Named,
        driver_name: "oracle",
        cli_executable: "sqlplus",
        supports_bind_vars: true,
        is_file_based: false,
        uses_connection_string: true,
        version_probe: Some("SELECT * FROM v$version WHERE banner LIKE 'Oracle%'"),
        default_port: Some(1521),
    },
    EngineProfile {
        engine: Engine::Postgres,
        parameter_style: ParameterStyle::Pyformat,
        driver_name: "sqlx-postgres",
        cli_executable: "psql",
        supports_bind_vars: true,
        is_file_based: false,
        uses_connection_string: true,
        version_probe: Some("SELECT version()"),
        default_port: Some(5432),
    },
    EngineProfile {
        engine: Engine::Sqlite,
        parameter_style: ParameterStyle::Named,
        driver_name: "sqlx-sqlite",
        cli_executable: "sqlite3",
        supports_bind_vars: true,
        is_file_based: true,
        uses_connection_string: true,
        version_probe: Some("select sqlite_version()"),
        default_port: None,
    },
    EngineProfile {
        engine: Engine::SqlServer,
        parameter_style: ParameterStyle::Qmark,
        driver_name: "odbc",
        cli_executable: "sqlcmd",
        supports_bind_vars: true,
        is_file_based: false,
        uses_connection_string: true,
        version_probe: Some("SELECT @@VERSION"),
        default_port: Some(1433),
    },
];

/// Returns the static profile for an engine.
pub fn profile_for(engine: Engine) -> &'static EngineProfile {
    PROFILES
        .iter()
        .find(|p| p.engine == engine)
        .expect("every engine has a profile")
}
