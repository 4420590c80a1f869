#![doc = include_str!("../README.md")]

use anyhow::Context;
use std::error::Error;
use std::str::FromStr;

/// Reads an environment variable, loading the `.env` file first.
///
/// Returns `Ok(None)` if the variable is not set, and an error if it is set
/// but not valid unicode.
#[track_caller]
pub fn var(key: &str) -> anyhow::Result<Option<String>> {
    match dotenvy::var(key) {
        Ok(content) => Ok(Some(content)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Reads an environment variable and parses it with [FromStr] if it is set.
#[track_caller]
pub fn var_parsed<R>(key: &str) -> anyhow::Result<Option<R>>
where
    R: FromStr,
    R::Err: Error + Send + Sync + 'static,
{
    var(key)?
        .map(|content| {
            content
                .parse()
                .with_context(|| format!("Failed to parse {key} environment variable"))
        })
        .transpose()
}

/// Reads a boolean flag. Only `1`, `true` and `yes` (in any case) are
/// considered set.
#[track_caller]
pub fn flag(key: &str) -> anyhow::Result<bool> {
    let enabled = var(key)?.is_some_and(|value| {
        let value = value.trim();
        value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
    });

    Ok(enabled)
}

/// Reads a comma-separated list. Entries are trimmed and empty entries are
/// dropped, so `"HR, ,SI"` yields `["HR", "SI"]`.
#[track_caller]
pub fn list(key: &str) -> anyhow::Result<Vec<String>> {
    let values = match var(key)? {
        None => vec![],
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    };

    Ok(values)
}
