//! Handler functions for `litterview config` commands.
//!
//! Also provides the TOML dotted-key helpers the handlers are built on.

use std::path::PathBuf;

use crate::cli::ConfigAction;
use crate::config::{LitterviewConfig, REDACTED};
use crate::error::{Error, Result};

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export { docker_env } => {
            let config = LitterviewConfig::load(config_path)?;
            cmd_config_export(&config, docker_env)
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match LitterviewConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!(
                    "(file does not exist; run `{} config init` to create it)",
                    LitterviewConfig::project_name()
                );
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Get a configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    println!("{}", config_value(config_path, key)?);
    Ok(())
}

/// The display form of the value at `key`. Secrets are masked.
pub fn config_value(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = LitterviewConfig::load(config_path)?;
    let value = toml::Value::try_from(&config)?;
    let found = get_nested_value(&value, key)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))?;
    if is_secret(key) {
        return Ok(REDACTED.to_string());
    }
    Ok(format_toml_value(found))
}

fn is_secret(key: &str) -> bool {
    key.ends_with("api_key")
}

/// Set a configuration value by dotted key in the config file.
pub fn cmd_config_set(config_path: Option<&str>, key: &str, value: &str) -> Result<()> {
    let path = LitterviewConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `{} config init` first.",
            path.display(),
            LitterviewConfig::project_name()
        )));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut doc: toml::Value = toml::from_str(&content).map_err(|source| Error::Parse {
        path: path.clone(),
        source,
    })?;

    set_nested_value(&mut doc, key, parse_value(value))?;

    // Reject edits that would leave a file the tool can no longer load.
    let rendered = toml::to_string_pretty(&doc)?;
    toml::from_str::<LitterviewConfig>(&rendered)
        .map_err(|e| Error::config(format!("Invalid value for '{key}': {e}")))?;
    std::fs::write(&path, rendered).map_err(|e| Error::io_with_path(e, &path))?;

    let shown = if is_secret(key) {
        REDACTED
    } else {
        value
    };
    println!("Set {key} = {shown} in {}", path.display());
    Ok(())
}

/// Create a default configuration file.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => LitterviewConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = LitterviewConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

/// Export configuration as environment variables.
pub fn cmd_config_export(config: &LitterviewConfig, docker_env: bool) -> Result<()> {
    for (key, value) in config.to_env_vars()? {
        if docker_env {
            println!("--env {key}={value}");
        } else {
            println!("{key}={value}");
        }
    }
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(Error::config("Empty key path"));
    };
    if parts.iter().any(|p| p.is_empty()) {
        return Err(Error::config(format!("Invalid key '{key}'")));
    }

    let mut current = root;
    for part in parents {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config("Cannot navigate into a non-table value"))?;
        current = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| Error::config("Cannot set key on a non-table value"))?;
    table.insert(last.to_string(), value);
    Ok(())
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool → integer → float → string.
pub fn parse_value(s: &str) -> toml::Value {
    if s == "true" {
        return toml::Value::Boolean(true);
    }
    if s == "false" {
        return toml::Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
