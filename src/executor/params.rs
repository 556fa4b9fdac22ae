//! Bind-parameter shape validation and placeholder normalization.
//!
//! Each engine's driver expects one placeholder syntax: `:name` (named),
//! `?` (qmark), or `%(name)s` (pyformat). Callers must supply parameters
//! in the matching shape; a mismatched shape is a caller error, never
//! silently coerced. Normalization rewrites whatever style the engine
//! speaks into `?` placeholders plus an ordered argument list, which is
//! what the adapters consume.

use crate::catalog::ParameterStyle;
use crate::driver::Value;
use crate::error::{Result, UnidbError};

/// Bind parameters for one statement, in the shape the engine's
/// parameter style dictates.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BindParams {
    #[default]
    None,
    /// Ordered values for `qmark` placeholders.
    Positional(Vec<Value>),
    /// Name/value pairs for `named` and `pyformat` placeholders.
    Named(Vec<(String, Value)>),
}

impl BindParams {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Positional(values) => values.is_empty(),
            Self::Named(pairs) => pairs.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Positional(values) => values.len(),
            Self::Named(pairs) => pairs.len(),
        }
    }
}

/// Validates the parameter shape against the style and rewrites the SQL
/// to `?` placeholders with an ordered argument list.
pub fn normalize(
    style: ParameterStyle,
    sql: &str,
    params: &BindParams,
) -> Result<(String, Vec<Value>)> {
    if params.is_empty() {
        return Ok((sql.to_string(), Vec::new()));
    }

    match (style, params) {
        (ParameterStyle::None, _) => Err(UnidbError::bind_shape(
            "this engine's statements are literal-only, no parameters accepted",
        )),
        (ParameterStyle::Qmark, BindParams::Positional(values)) => {
            let found = count_qmarks(sql);
            if found != values.len() {
                return Err(UnidbError::bind_shape(format!(
                    "statement has {found} '?' placeholder(s) but {} value(s) were supplied",
                    values.len()
                )));
            }
            Ok((sql.to_string(), values.clone()))
        }
        (ParameterStyle::Qmark, _) => Err(UnidbError::bind_shape(
            "qmark style takes an ordered sequence of values, not a name mapping",
        )),
        (ParameterStyle::Named, BindParams::Named(pairs)) => {
            let (rewritten, names) = scan_named(sql);
            order_by_names(rewritten, &names, pairs)
        }
        (ParameterStyle::Pyformat, BindParams::Named(pairs)) => {
            let (rewritten, names) = scan_pyformat(sql)?;
            order_by_names(rewritten, &names, pairs)
        }
        (ParameterStyle::Named | ParameterStyle::Pyformat, _) => Err(UnidbError::bind_shape(
            format!(
                "{} style takes a name-to-value mapping, not an ordered sequence",
                style.as_str()
            ),
        )),
    }
}

/// Resolves scanned placeholder names against the supplied pairs,
/// requiring an exact two-way match.
fn order_by_names(
    rewritten: String,
    names: &[String],
    pairs: &[(String, Value)],
) -> Result<(String, Vec<Value>)> {
    let mut args = Vec::with_capacity(names.len());
    for name in names {
        let value = pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| {
                UnidbError::bind_shape(format!("no value supplied for placeholder \"{name}\""))
            })?;
        args.push(value);
    }
    for (name, _) in pairs {
        if !names.contains(name) {
            return Err(UnidbError::bind_shape(format!(
                "value \"{name}\" does not match any placeholder in the statement"
            )));
        }
    }
    Ok((rewritten, args))
}

/// Counts `?` placeholders outside single-quoted literals.
fn count_qmarks(sql: &str) -> usize {
    let mut count = 0;
    let mut in_string = false;
    for ch in sql.chars() {
        match ch {
            '\'' => in_string = !in_string,
            '?' if !in_string => count += 1,
            _ => {}
        }
    }
    count
}

/// Rewrites `:name` placeholders to `?`, returning names in textual
/// order. Skips quoted literals and `::` casts.
fn scan_named(sql: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\'' {
            in_string = !in_string;
            out.push(ch);
            i += 1;
        } else if ch == ':' && !in_string {
            if chars.get(i + 1) == Some(&':') {
                out.push_str("::");
                i += 2;
                continue;
            }
            let mut j = i + 1;
            let mut name = String::new();
            while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                name.push(chars[j]);
                j += 1;
            }
            if name.is_empty() {
                out.push(ch);
                i += 1;
            } else {
                names.push(name);
                out.push('?');
                i = j;
            }
        } else {
            out.push(ch);
            i += 1;
        }
    }
    (out, names)
}

/// Rewrites `%(name)s` placeholders to `?`, returning names in textual
/// order. Skips quoted literals.
fn scan_pyformat(sql: &str) -> Result<(String, Vec<String>)> {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '\'' {
            in_string = !in_string;
            out.push(ch);
            i += 1;
        } else if ch == '%' && !in_string && chars.get(i + 1) == Some(&'(') {
            let mut j = i + 2;
            let mut name = String::new();
            while j < chars.len() && chars[j] != ')' {
                name.push(chars[j]);
                j += 1;
            }
            if j + 1 >= chars.len() || chars.get(j) != Some(&')') || chars.get(j + 1) != Some(&'s')
            {
                return Err(UnidbError::bind_shape(format!(
                    "malformed pyformat placeholder near \"%({name}\""
                )));
            }
            names.push(name);
            out.push('?');
            i = j + 2;
        } else {
            out.push(ch);
            i += 1;
        }
    }
    Ok((out, names))
}
