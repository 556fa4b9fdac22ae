//! Data-type classification for unidb.
//!
//! Maps an engine's rendered type string to a coarse group, so callers
//! can decide things like "does this value need quoting in a literal"
//! without knowing every engine's type zoo. Classification is by
//! substring over the lowercased type name, in a fixed precedence order;
//! two substrings are engine-sensitive (`bit` is a boolean only on SQL
//! Server, `byte` is binary everywhere except inside Oracle's
//! `CHAR(n BYTE)` length annotation).

use crate::catalog::Engine;

/// Coarse grouping of a column's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeGroup {
    /// National-character types (nchar, nvarchar, nclob).
    Unicode,
    /// Raw bytes (blob, binary, image, raw; bit outside SQL Server).
    Binary,
    /// Character data (char, text, long, clob).
    String,
    /// All numerics, exact and approximate, including money types.
    Number,
    /// Dates, times, intervals, and year types.
    Datetime,
    /// Booleans (bool anywhere; bit on SQL Server).
    Boolean,
    /// Anything unrecognized.
    Other,
}

impl DataTypeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unicode => "UNICODE",
            Self::Binary => "BINARY",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Datetime => "DATETIME",
            Self::Boolean => "BOOLEAN",
            Self::Other => "OTHER",
        }
    }

    /// True when literals of this group need single quotes in SQL text.
    pub fn needs_quoting(&self) -> bool {
        matches!(self, Self::Unicode | Self::String | Self::Datetime)
    }
}

/// Classifies a rendered type string for one engine.
///
/// The order of the checks matters: `nvarchar` must hit Unicode before
/// the `char` check, `long raw` must hit Binary before the `long` check.
pub fn classify(engine: Engine, rendered_type: &str) -> DataTypeGroup {
    let t = rendered_type.to_lowercase();
    let has = |needle: &str| t.contains(needle);

    if has("nchar") || has("nvarchar") || has("nclob") {
        DataTypeGroup::Unicode
    } else if (has("bit") && engine != Engine::SqlServer)
        || has("raw")
        || has("image")
        || has("binary")
        || has("blob")
        || (has("byte") && engine != Engine::Oracle)
    {
        DataTypeGroup::Binary
    } else if has("char") || has("text") || has("long") || has("clob") {
        DataTypeGroup::String
    } else if has("int")
        || has("number")
        || has("numeric")
        || has("decimal")
        || has("real")
        || has("float")
        || has("double")
        || has("money")
        || has("currency")
    {
        DataTypeGroup::Number
    } else if has("date") || has("time") || has("interval") || has("year") {
        DataTypeGroup::Datetime
    } else if has("bool") || (has("bit") && engine == Engine::SqlServer) {
        DataTypeGroup::Boolean
    } else {
        DataTypeGroup::Other
    }
}

/// Encloses a string in single quotes, doubling any embedded quotes.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
