//! Copy options and configuration loading for cpdirplus.
//!
//! This crate provides the option types shared by the library and the CLI, and
//! loading of those options from a configuration file.
//!
//! # Supported Config Formats
//!
//! * TOML (`*.toml`)
//! * JSON (`*.json`)
//!
//! Keys use the camelCase spelling of the option names (`renameFiles`,
//! `replacements`, ...).
//!
//! # Example
//!
//! ```rust,ignore
//! use cpdirplus_config::load_config;
//!
//! let loaded = load_config(Path::new("cpdir.config.toml"))?;
//! loaded.options.validate()?;
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_json_config, load_toml_config};
pub use types::{CopyOptions, LoadedConfig, PatternSet, ReplacementRule, TransferMode};
