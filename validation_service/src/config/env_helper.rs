use std::str::FromStr;

use anyhow::{Context, Result};

fn parse_env_value<T: FromStr>(var_name: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("{} is not a valid {}", var_name, raw))
}

/// Reads a required setting from the process environment
///
/// # Errors
///
/// Fails when `var_name` is unset or cannot be parsed as `T`
pub fn load_env_var<T: FromStr>(var_name: &str) -> Result<T> {
    let raw = std::env::var(var_name).with_context(|| format!("{} is not set", var_name))?;
    parse_env_value(var_name, &raw)
}

/// Reads an optional setting, using `default` when `var_name` is unset
///
/// A value that is set but unparsable is still an error.
pub fn load_env_var_or<T: FromStr>(var_name: &str, default: T) -> Result<T> {
    match std::env::var(var_name) {
        Ok(raw) => parse_env_value(var_name, &raw),
        Err(_) => Ok(default),
    }
}
