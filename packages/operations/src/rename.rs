//! Exact file name renames.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;

/// Mapping of exact source names to destination names.
///
/// No pattern matching is performed; a name either has an entry or is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap(BTreeMap<String, String>);

impl RenameMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rename for `from`.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// The destination name for `filename`.
    #[must_use]
    pub fn resolve<'a>(&'a self, filename: &'a str) -> &'a str {
        self.0.get(filename).map_or(filename, String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<String, String>> for RenameMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
