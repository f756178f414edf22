use clap::Subcommand;
use serde_json::Value;
use std::path::Path;

use summify_store::{config_path, keys, parse_value, read_config, write_config};

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (backend_url, token, user_id)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Remove a config value
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, store_root: &Path) -> anyhow::Result<()> {
    let out = match cmd {
        ConfigCmd::Set { key, value } => set(store_root, &key, &value)?,
        ConfigCmd::Get { key } => get(store_root, &key)?,
        ConfigCmd::Unset { key } => unset(store_root, &key)?,
        ConfigCmd::List => list(store_root)?,
    };
    print!("{out}");
    Ok(())
}

// ── Command Implementations ──

/// Tokens are never echoed back in full.
fn display_value(key: &str, value: &Value) -> String {
    if key == keys::TOKEN {
        return "<redacted>".to_string();
    }
    value.to_string()
}

/// `summify config set <key> <value>`
fn set(store_root: &Path, key: &str, value: &str) -> anyhow::Result<String> {
    if key.trim().is_empty() {
        anyhow::bail!("config key must not be empty");
    }
    let path = config_path(store_root);
    let mut config = read_config(&path)?;
    // Tokens and ids stay strings even when they look numeric.
    let parsed = match key {
        keys::TOKEN | keys::BACKEND_URL | keys::USER_ID => Value::String(value.to_string()),
        _ => parse_value(value),
    };
    let shown = display_value(key, &parsed);
    config.insert(key.to_string(), parsed);
    write_config(&path, &config)?;
    tracing::debug!(key, path = %path.display(), "config updated");
    Ok(format!("{key} = {shown}\n"))
}

/// `summify config get <key>`
fn get(store_root: &Path, key: &str) -> anyhow::Result<String> {
    let config = read_config(&config_path(store_root))?;
    Ok(match config.get(key) {
        Some(val) => format!("{}\n", display_value(key, val)),
        None => "(not set)\n".to_string(),
    })
}

/// `summify config unset <key>`
fn unset(store_root: &Path, key: &str) -> anyhow::Result<String> {
    let path = config_path(store_root);
    let mut config = read_config(&path)?;
    if config.remove(key).is_none() {
        return Ok("(not set)\n".to_string());
    }
    write_config(&path, &config)?;
    Ok(format!("{key} removed\n"))
}

/// `summify config list`
fn list(store_root: &Path) -> anyhow::Result<String> {
    let config = read_config(&config_path(store_root))?;
    if config.is_empty() {
        return Ok("(no config set)\n".to_string());
    }
    Ok(config
        .iter()
        .map(|(k, v)| format!("{k} = {}\n", display_value(k, v)))
        .collect())
}
