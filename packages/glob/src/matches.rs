//! Include/exclude match sets computed once per traversal.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::GlobError;
use crate::resolve::resolve_matches;

/// Resolved include and exclude sets, relative to the traversal root.
///
/// An entry present in both sets is excluded. Directories that are not
/// matched themselves are still admitted when an included path lies beneath
/// them, otherwise a pattern like `**/*.txt` could never reach nested files.
#[derive(Debug, Clone, Default)]
pub struct MatchSets {
    include: BTreeSet<PathBuf>,
    include_parents: BTreeSet<PathBuf>,
    exclude: BTreeSet<PathBuf>,
}

impl MatchSets {
    /// Resolve both pattern sets against `base`.
    ///
    /// # Errors
    ///
    /// * If any pattern is invalid
    /// * If the directory walk fails
    pub fn resolve<I, E>(base: &Path, include: &[I], exclude: &[E]) -> Result<Self, GlobError>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        let include = resolve_matches(base, include)?;
        let exclude = resolve_matches(base, exclude)?;

        Ok(Self::from_sets(include, exclude))
    }

    /// Build match sets from already-resolved relative paths.
    #[must_use]
    pub fn from_sets(include: BTreeSet<PathBuf>, exclude: BTreeSet<PathBuf>) -> Self {
        let include_parents = include
            .iter()
            .flat_map(|path| path.ancestors().skip(1))
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();

        Self {
            include,
            include_parents,
            exclude,
        }
    }

    /// Whether `relative` matched an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude.contains(relative)
    }

    /// Whether `relative` matched an include pattern.
    #[must_use]
    pub fn is_included(&self, relative: &Path) -> bool {
        self.include.contains(relative)
    }

    /// Decide whether an entry should enter the pipeline.
    #[must_use]
    pub fn admits(&self, relative: &Path, is_dir: bool) -> bool {
        if self.is_excluded(relative) {
            return false;
        }

        self.is_included(relative) || (is_dir && self.include_parents.contains(relative))
    }

    /// Number of included paths.
    #[must_use]
    pub fn include_len(&self) -> usize {
        self.include.len()
    }

    /// Number of excluded paths.
    #[must_use]
    pub fn exclude_len(&self) -> usize {
        self.exclude.len()
    }
}
