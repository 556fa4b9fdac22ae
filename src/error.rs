//! Error types for unidb.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for unidb operations.
#[derive(Error, Debug)]
pub enum UnidbError {
    /// The requested engine is not in the supported set.
    #[error("Unknown database engine \"{0}\"")]
    UnknownEngine(String),

    /// Connection-establishment errors (host unreachable, auth failed,
    /// no adapter compiled for the engine, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A cursor operation referenced an owner with no registered cursor.
    #[error("No cursor registered for owner \"{0}\"")]
    UnknownOwner(String),

    /// An owner asked for a second cursor without releasing its first.
    #[error("Owner \"{0}\" already holds an open cursor")]
    CursorConflict(String),

    /// A non-forced close was refused because cursors remain open.
    #[error("{0} dependent cursor(s) still open, refusing to close connection")]
    DependentCursorsExist(usize),

    /// Statement execution was requested with empty SQL text.
    #[error("No SQL to execute")]
    EmptyStatement,

    /// Bind parameters were supplied for an engine that rejects them.
    #[error("Bind variables are not supported by {0}")]
    BindVarsUnsupported(String),

    /// Bind parameters do not match the engine's parameter style.
    #[error("Bind parameter shape mismatch: {0}")]
    BindShapeMismatch(String),

    /// A driver-level failure during statement execution.
    ///
    /// Only surfaced under `FailurePolicy::Propagate`; the default policy
    /// degrades these to an empty result and a logged trace.
    #[error("Driver execution failure: {0}")]
    DriverExecution(String),

    /// The (object kind, engine) pair has no usable catalog query.
    /// Carries the human-readable skip message.
    #[error("{0}")]
    IntrospectionNotSupported(String),

    /// Configuration errors (invalid config file, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UnidbError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a driver execution error with the given message.
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::DriverExecution(msg.into())
    }

    /// Creates a bind-shape mismatch error with the given message.
    pub fn bind_shape(msg: impl Into<String>) -> Self {
        Self::BindShapeMismatch(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownEngine(_) => "Unknown Engine",
            Self::Connection(_) => "Connection Error",
            Self::UnknownOwner(_) | Self::CursorConflict(_) | Self::DependentCursorsExist(_) => {
                "Cursor Error"
            }
            Self::EmptyStatement
            | Self::BindVarsUnsupported(_)
            | Self::BindShapeMismatch(_)
            | Self::DriverExecution(_) => "Statement Error",
            Self::IntrospectionNotSupported(_) => "Introspection Skipped",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using UnidbError.
pub type Result<T> = std::result::Result<T, UnidbError>;
