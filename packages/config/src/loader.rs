//! Configuration file loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{CopyOptions, LoadedConfig};

/// Load a configuration file, auto-detecting the format based on extension.
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// * If the file extension is not supported
/// * If the file cannot be read
/// * If the file cannot be parsed
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let options = match extension {
        "toml" => load_toml_config(path)?,
        "json" => load_json_config(path)?,
        _ => return Err(ConfigError::UnsupportedFormat(extension.to_string())),
    };

    Ok(LoadedConfig {
        options,
        config_path: path.to_path_buf(),
    })
}

/// Load a TOML configuration file.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML
pub fn load_toml_config(path: &Path) -> Result<CopyOptions, ConfigError> {
    log::debug!("Loading TOML config from {}", path.display());

    let content = read(path)?;

    toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a JSON configuration file.
///
/// The document must be an object; any other JSON value is rejected.
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as a JSON object
pub fn load_json_config(path: &Path) -> Result<CopyOptions, ConfigError> {
    log::debug!("Loading JSON config from {}", path.display());

    let content = read(path)?;

    serde_json::from_str(&content).map_err(|e| ConfigError::JsonParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
