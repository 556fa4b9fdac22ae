//! Native CLI-client bridge.
//!
//! Builds the argument vector for an engine's own command-line client
//! (sqlplus, psql, mysqlsh, sqlcmd, sqlite3). This module only builds
//! the invocation; it never spawns the subprocess.

use super::{profile_for, Engine};
use crate::instance::{ConnectionTarget, Credentials};
use std::path::Path;

/// Outcome of building a native client invocation.
///
/// `Unavailable` mirrors the "no CLI client / not on PATH" sentinel:
/// it is an advertised limitation for the caller to display, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInvocation {
    Command(Vec<String>),
    Unavailable(String),
}

/// Builds the argv for the engine's native command-line client.
pub fn client_invocation(
    engine: Engine,
    target: &ConnectionTarget,
    credentials: &Credentials,
) -> ClientInvocation {
    let profile = profile_for(engine);
    let exe = profile.cli_executable;

    if exe.is_empty() {
        return ClientInvocation::Unavailable(format!(
            "{} DOES NOT HAVE A COMMAND LINE INTERFACE.",
            engine.as_str().to_uppercase()
        ));
    }
    // Target shape is checked before the PATH scan, so a mismatch gets
    // the same answer whether or not the client happens to be installed.
    if profile.is_file_based != matches!(target, ConnectionTarget::File { .. }) {
        let reason = if profile.is_file_based {
            format!("{exe} opens a database file, not a network endpoint.")
        } else {
            format!("{exe} does not open database files.")
        };
        return ClientInvocation::Unavailable(reason);
    }
    if !executable_in_path(exe) {
        return ClientInvocation::Unavailable(format!("Did not find {exe} in PATH."));
    }

    let (host, port, instance) = match target {
        ConnectionTarget::Network {
            host,
            port,
            instance,
        } => (host.as_str(), *port, instance.as_str()),
        ConnectionTarget::File { path } => {
            // SQLite is the only file engine with a CLI client.
            return ClientInvocation::Command(vec![exe.to_string(), path.display().to_string()]);
        }
    };
    let user = credentials.username.as_str();
    let password = credentials.password.as_str();

    let argv = match engine {
        Engine::Mysql => vec![
            exe.to_string(),
            format!("--uri={user}:{password}@{host}:{port}/{instance}"),
            "--table".to_string(),
            "--sql".to_string(),
            "--quiet-start".to_string(),
        ],
        Engine::Oracle => vec![
            exe.to_string(),
            format!("{user}/{password}@{host}:{port}/{instance}"),
        ],
        Engine::Postgres => vec![
            exe.to_string(),
            "-d".to_string(),
            format!("postgresql://{user}:{password}@{host}:{port}/{instance}"),
        ],
        Engine::SqlServer => vec![
            exe.to_string(),
            "-U".to_string(),
            user.to_string(),
            "-P".to_string(),
            password.to_string(),
            "-S".to_string(),
            format!("{host},{port}"),
            "-d".to_string(),
            instance.to_string(),
            "-s".to_string(),
            "|".to_string(),
        ],
        // File engines took the file path above (Access has no client),
        // so neither can arrive here with a network target.
        Engine::Sqlite | Engine::Access => {
            return ClientInvocation::Unavailable(format!(
                "{exe} opens a database file, not a network endpoint."
            ))
        }
    };
    ClientInvocation::Command(argv)
}

/// Scans the PATH directories for an executable with the given name.
fn executable_in_path(name: &str) -> bool {
    let name = if cfg!(windows) {
        format!("{}.exe", name.to_lowercase())
    } else {
        name.to_lowercase()
    };

    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var)
        .filter(|dir| dir != Path::new("") && dir != Path::new("."))
        .any(|dir| {
            std::fs::read_dir(&dir)
                .map(|entries| {
                    entries.flatten().any(|entry| {
                        entry.file_type().map(|t| t.is_file()).unwrap_or(false)
                            && entry.file_name().to_string_lossy().to_lowercase() == name
                    })
                })
                .unwrap_or(false)
        })
}
