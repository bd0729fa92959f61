//! Detect and fill configuration keys missing from an older config file.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys present in the default configuration but absent from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let user = parse_mapping(content)?;
    let defaults = default_mapping()?;

    Ok(defaults
        .keys()
        .filter(|k| !user.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Merge defaults into `content`, keeping every user value.
/// Returns the merged YAML and the keys that were added.
pub fn fill_missing(content: &str) -> AppResult<(String, Vec<String>)> {
    let mut user = parse_mapping(content)?;
    let mut added = Vec::new();

    for (k, v) in default_mapping()? {
        if !user.contains_key(&k) {
            if let Some(name) = k.as_str() {
                added.push(name.to_string());
            }
            user.insert(k, v);
        }
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(user))
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok((yaml, added))
}

/// Rewrite the config file at `path` with missing keys filled in.
pub fn migrate_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let (yaml, added) = fill_missing(&content)?;

    if !added.is_empty() {
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)?;
    }
    Ok(added)
}

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(content) {
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(_) => Err(AppError::Config("configuration is not a mapping".into())),
        Err(e) => Err(AppError::Config(e.to_string())),
    }
}

fn default_mapping() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(_) => Err(AppError::Other("default configuration is not a mapping".into())),
        Err(e) => Err(AppError::Config(e.to_string())),
    }
}
