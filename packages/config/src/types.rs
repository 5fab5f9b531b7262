//! Configuration types for cpdirplus.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One glob pattern or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSet {
    /// A single pattern.
    One(String),
    /// Several patterns; an entry matching any of them matches the set.
    Many(Vec<String>),
}

impl PatternSet {
    /// The patterns as a list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern.clone()],
            Self::Many(patterns) => patterns.clone(),
        }
    }
}

impl From<&str> for PatternSet {
    fn from(pattern: &str) -> Self {
        Self::One(pattern.to_string())
    }
}

impl From<Vec<String>> for PatternSet {
    fn from(patterns: Vec<String>) -> Self {
        Self::Many(patterns)
    }
}

/// A content substitution applied by the built-in replacement plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Text (or regular expression, see `regex`) to search for.
    pub search: String,
    /// Replacement text. With `regex`, `$1`-style group references expand.
    pub replace: String,
    /// Treat `search` as a regular expression.
    #[serde(default)]
    pub regex: bool,
    /// File name globs this rule applies to. Empty means every file.
    #[serde(default)]
    pub files: Vec<String>,
}

impl ReplacementRule {
    /// A literal rule applying to every file.
    #[must_use]
    pub fn literal(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
            regex: false,
            files: Vec::new(),
        }
    }
}

/// How entries reach the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Copy entries, leaving the source untouched.
    #[default]
    Copy,
    /// Copy entries, then remove the sources this run materialized and prune
    /// source directories left empty.
    Move,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
        }
    }
}

/// Options for one tree transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOptions {
    /// Source directory.
    #[serde(default)]
    pub from: Option<PathBuf>,

    /// Destination directory.
    #[serde(default)]
    pub to: Option<PathBuf>,

    /// Regular expression every entry name must match.
    #[serde(default)]
    pub test: Option<String>,

    /// Patterns selecting entries to copy. Unset means everything.
    #[serde(default)]
    pub include: Option<PatternSet>,

    /// Patterns selecting entries to leave out. Unset means nothing.
    #[serde(default)]
    pub exclude: Option<PatternSet>,

    /// Exact file name renames applied at the destination.
    #[serde(default)]
    pub rename_files: BTreeMap<String, String>,

    /// Content substitutions for the built-in replacement plugin.
    #[serde(default)]
    pub replacements: Vec<ReplacementRule>,

    /// Copy or move. Unset means copy.
    #[serde(default)]
    pub mode: Option<TransferMode>,

    /// Maximum number of entries processed at once. Unset means one per CPU.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl CopyOptions {
    /// Check that the options describe a runnable transfer.
    ///
    /// # Errors
    ///
    /// * If `from` or `to` is missing or empty
    /// * If `concurrency` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_path(self.from.as_deref(), "from")?;
        require_path(self.to.as_deref(), "to")?;

        if self.concurrency == Some(0) {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// The transfer mode, copy when unset.
    #[must_use]
    pub fn transfer_mode(&self) -> TransferMode {
        self.mode.unwrap_or_default()
    }

    /// Layer `overrides` on top of these options.
    ///
    /// Set values in `overrides` win; rename entries and replacement rules
    /// are appended.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        if overrides.from.is_some() {
            self.from = overrides.from;
        }
        if overrides.to.is_some() {
            self.to = overrides.to;
        }
        if overrides.test.is_some() {
            self.test = overrides.test;
        }
        if overrides.include.is_some() {
            self.include = overrides.include;
        }
        if overrides.exclude.is_some() {
            self.exclude = overrides.exclude;
        }
        if overrides.mode.is_some() {
            self.mode = overrides.mode;
        }
        if overrides.concurrency.is_some() {
            self.concurrency = overrides.concurrency;
        }
        self.rename_files.extend(overrides.rename_files);
        self.replacements.extend(overrides.replacements);
        self
    }
}

fn require_path(path: Option<&Path>, field: &'static str) -> Result<(), ConfigError> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => Ok(()),
        _ => Err(ConfigError::MissingField(field)),
    }
}

/// Options loaded from a configuration file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed options.
    pub options: CopyOptions,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runnable() -> CopyOptions {
        CopyOptions {
            from: Some(PathBuf::from("src")),
            to: Some(PathBuf::from("dist")),
            ..CopyOptions::default()
        }
    }

    #[test]
    fn test_validate_requires_from_and_to() {
        let err = CopyOptions::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("from")));

        let options = CopyOptions {
            from: Some(PathBuf::from("src")),
            to: Some(PathBuf::new()),
            ..CopyOptions::default()
        };
        assert!(matches!(
            options.validate().unwrap_err(),
            ConfigError::MissingField("to")
        ));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let options = CopyOptions {
            concurrency: Some(0),
            ..runnable()
        };
        assert!(matches!(
            options.validate().unwrap_err(),
            ConfigError::Invalid {
                field: "concurrency",
                ..
            }
        ));
        assert!(runnable().validate().is_ok());
    }

    #[test]
    fn test_merge_overrides_win() {
        let mut base = runnable();
        base.rename_files
            .insert("a.txt".to_string(), "b.txt".to_string());

        let mut overrides = CopyOptions {
            to: Some(PathBuf::from("out")),
            mode: Some(TransferMode::Move),
            ..CopyOptions::default()
        };
        overrides
            .rename_files
            .insert("c.txt".to_string(), "d.txt".to_string());

        let merged = base.merge(overrides);

        assert_eq!(merged.from, Some(PathBuf::from("src")));
        assert_eq!(merged.to, Some(PathBuf::from("out")));
        assert_eq!(merged.transfer_mode(), TransferMode::Move);
        assert_eq!(merged.rename_files.len(), 2);
    }

    #[test]
    fn test_merge_can_force_copy_over_move() {
        let base = CopyOptions {
            mode: Some(TransferMode::Move),
            ..runnable()
        };

        let kept = base.clone().merge(CopyOptions::default());
        assert_eq!(kept.transfer_mode(), TransferMode::Move);

        let forced = base.merge(CopyOptions {
            mode: Some(TransferMode::Copy),
            ..CopyOptions::default()
        });
        assert_eq!(forced.transfer_mode(), TransferMode::Copy);
    }

    #[test]
    fn test_pattern_set_to_vec() {
        assert_eq!(PatternSet::from("*.txt").to_vec(), vec!["*.txt"]);
        assert_eq!(
            PatternSet::from(vec!["a".to_string(), "b".to_string()]).to_vec(),
            vec!["a", "b"]
        );
    }
}
