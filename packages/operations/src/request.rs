//! Validated, resolved transfer requests.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cpdirplus_config::{ConfigError, CopyOptions, TransferMode};
use cpdirplus_glob::MATCH_ALL;
use path_clean::PathClean;
use regex::Regex;

use crate::error::OperationError;
use crate::rename::RenameMap;

/// A [`CopyOptions`] that passed validation, with paths resolved and
/// patterns compiled. Immutable for the duration of a transfer.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// Absolute, cleaned source root.
    pub from: PathBuf,
    /// Absolute, cleaned destination root.
    pub to: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub test: Option<Regex>,
    pub rename_files: Arc<RenameMap>,
    pub mode: TransferMode,
    /// Worker count, at least 1.
    pub concurrency: usize,
    /// The options as given.
    pub raw: Arc<CopyOptions>,
}

impl CopyRequest {
    /// Validate `options` and resolve relative paths against `base`, or
    /// the current directory when `base` is `None`.
    ///
    /// # Errors
    ///
    /// * If `from` or `to` is missing or empty
    /// * If `concurrency` is zero
    /// * If the `test` pattern is not a valid regular expression
    /// * If the current directory cannot be determined
    pub fn resolve(options: CopyOptions, base: Option<&Path>) -> Result<Self, OperationError> {
        options.validate()?;

        let base = match base {
            Some(base) => base.to_path_buf(),
            None => env::current_dir().map_err(OperationError::CurrentDir)?,
        };

        let from = options
            .from
            .as_deref()
            .ok_or(ConfigError::MissingField("from"))?;
        let to = options.to.as_deref().ok_or(ConfigError::MissingField("to"))?;

        let test = options
            .test
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| OperationError::InvalidPattern {
                    field: "test",
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let include = options
            .include
            .as_ref()
            .map_or_else(|| vec![MATCH_ALL.to_string()], cpdirplus_config::PatternSet::to_vec);
        let exclude = options
            .exclude
            .as_ref()
            .map(cpdirplus_config::PatternSet::to_vec)
            .unwrap_or_default();

        Ok(Self {
            from: absolutize(&base, from),
            to: absolutize(&base, to),
            include,
            exclude,
            test,
            rename_files: Arc::new(RenameMap::from(options.rename_files.clone())),
            mode: options.transfer_mode(),
            concurrency: options.concurrency.unwrap_or_else(num_cpus::get),
            raw: Arc::new(options),
        })
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        base.join(path).clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpdirplus_config::PatternSet;

    fn options(from: &str, to: &str) -> CopyOptions {
        CopyOptions {
            from: Some(PathBuf::from(from)),
            to: Some(PathBuf::from(to)),
            ..CopyOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let request = CopyRequest::resolve(options("/a", "/b"), None).unwrap();

        assert_eq!(request.include, vec![MATCH_ALL]);
        assert!(request.exclude.is_empty());
        assert!(request.test.is_none());
        assert_eq!(request.mode, TransferMode::Copy);
        assert!(request.concurrency >= 1);
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let request =
            CopyRequest::resolve(options("assets/./img", "../dist"), Some(Path::new("/work/app")))
                .unwrap();

        assert_eq!(request.from, PathBuf::from("/work/app/assets/img"));
        assert_eq!(request.to, PathBuf::from("/work/dist"));
    }

    #[test]
    fn test_patterns_carried_over() {
        let request = CopyRequest::resolve(
            CopyOptions {
                include: Some(PatternSet::from("**/*.txt")),
                exclude: Some(PatternSet::from(vec!["a".to_string(), "b".to_string()])),
                ..options("/a", "/b")
            },
            None,
        )
        .unwrap();

        assert_eq!(request.include, vec!["**/*.txt"]);
        assert_eq!(request.exclude, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_to_is_rejected() {
        let err = CopyRequest::resolve(
            CopyOptions {
                from: Some(PathBuf::from("/a")),
                ..CopyOptions::default()
            },
            None,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            OperationError::Config(ConfigError::MissingField("to"))
        ));
    }

    #[test]
    fn test_invalid_test_regex() {
        let err = CopyRequest::resolve(
            CopyOptions {
                test: Some("(".to_string()),
                ..options("/a", "/b")
            },
            None,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            OperationError::InvalidPattern { field: "test", .. }
        ));
    }
}
