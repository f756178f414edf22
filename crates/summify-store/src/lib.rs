use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Environment variable that overrides the store root (used by tests and CI).
pub const STORE_DIR_ENV: &str = "SUMMIFY_HOME";

/// Well-known config keys.
pub mod keys {
    pub const BACKEND_URL: &str = "backend_url";
    pub const TOKEN: &str = "token";
    pub const USER_ID: &str = "user_id";
}

/// Return the per-user store root.
/// `$SUMMIFY_HOME` if set, else `<config_dir>/summify`, else `~/.summify`.
pub fn store_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(STORE_DIR_ENV) {
        PathBuf::from(dir)
    } else if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("summify")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".summify")
    } else {
        PathBuf::from(".summify")
    }
}

/// Path of the config file inside a store root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join("config.json")
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Read the config object. Returns an empty map if the file doesn't exist or
/// does not hold a JSON object.
pub fn read_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = fs::read_to_string(path)?;
    let val: Value = serde_json::from_str(&content)?;
    match val {
        Value::Object(map) => Ok(map),
        other => {
            tracing::warn!(path = %path.display(), "config is not a JSON object, ignoring: {other}");
            Ok(Map::new())
        }
    }
}

pub fn write_config(path: &Path, config: &Map<String, Value>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())
}

/// String value for `key`, if set. Numbers are rendered as text so a numeric
/// user id reads back the same way it was typed.
pub fn config_string(config: &Map<String, Value>, key: &str) -> Option<String> {
    match config.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}
