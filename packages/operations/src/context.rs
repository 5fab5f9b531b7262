//! Per-entry state flowing through the pipeline.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cpdirplus_config::CopyOptions;

use crate::rename::RenameMap;

/// Working state for one filesystem entry.
///
/// Stages may replace any public field. The original options, the name the
/// entry was enumerated under and its root-relative path are read-only.
#[derive(Debug, Clone)]
pub struct EntryContext {
    /// Directory the entry is read from.
    pub from: PathBuf,
    /// Directory the entry is written to.
    pub to: PathBuf,
    /// Name the entry is written under, before renames are applied.
    pub filename: String,
    /// Renames applied after the entry is materialized.
    pub rename_files: Arc<RenameMap>,
    /// Bytes to write instead of copying the source file.
    pub contents: Option<Vec<u8>>,
    source_name: String,
    relative_path: PathBuf,
    raw: Arc<CopyOptions>,
}

impl EntryContext {
    /// Create a context for `filename` inside `from`, targeting `to`.
    #[must_use]
    pub fn new(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        filename: impl Into<String>,
        raw: Arc<CopyOptions>,
    ) -> Self {
        let filename = filename.into();
        Self {
            from: from.into(),
            to: to.into(),
            relative_path: PathBuf::from(&filename),
            source_name: filename.clone(),
            filename,
            rename_files: Arc::new(RenameMap::from(raw.rename_files.clone())),
            contents: None,
            raw,
        }
    }

    /// The options the transfer was started with.
    #[must_use]
    pub fn raw_options(&self) -> &CopyOptions {
        &self.raw
    }

    /// The name the entry was enumerated under.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The entry's path relative to the source root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Where the entry is read from.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.from.join(&self.source_name)
    }

    /// Where the entry is written before any rename.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.to.join(&self.filename)
    }

    pub(crate) fn raw(&self) -> &Arc<CopyOptions> {
        &self.raw
    }
}

/// One directory level of a traversal.
#[derive(Debug, Clone)]
pub(crate) struct DirLevel {
    pub from: PathBuf,
    pub to: PathBuf,
    pub relative: PathBuf,
    pub rename_files: Arc<RenameMap>,
    pub raw: Arc<CopyOptions>,
}

impl DirLevel {
    /// Build the context for entry `name` of this level.
    pub fn entry(&self, name: &str) -> EntryContext {
        EntryContext {
            from: self.from.clone(),
            to: self.to.clone(),
            filename: name.to_string(),
            rename_files: Arc::clone(&self.rename_files),
            contents: None,
            source_name: name.to_string(),
            relative_path: self.relative.join(name),
            raw: Arc::clone(&self.raw),
        }
    }

    /// The level below this one, for a subdirectory entry that passed the pipeline.
    pub fn descend(ctx: &EntryContext, target_name: &str) -> Self {
        Self {
            from: ctx.source_path(),
            to: ctx.to.join(target_name),
            relative: ctx.relative_path.clone(),
            rename_files: Arc::clone(&ctx.rename_files),
            raw: Arc::clone(ctx.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> DirLevel {
        DirLevel {
            from: PathBuf::from("/src/assets"),
            to: PathBuf::from("/dist/assets"),
            relative: PathBuf::from("assets"),
            rename_files: Arc::new(RenameMap::new()),
            raw: Arc::new(CopyOptions::default()),
        }
    }

    #[test]
    fn test_entry_paths() {
        let ctx = level().entry("logo.svg");

        assert_eq!(ctx.source_path(), PathBuf::from("/src/assets/logo.svg"));
        assert_eq!(ctx.target_path(), PathBuf::from("/dist/assets/logo.svg"));
        assert_eq!(ctx.relative_path(), Path::new("assets/logo.svg"));
    }

    #[test]
    fn test_mutated_filename_keeps_source_name() {
        let mut ctx = level().entry("logo.svg");
        ctx.filename = "brand.svg".to_string();

        assert_eq!(ctx.source_name(), "logo.svg");
        assert_eq!(ctx.source_path(), PathBuf::from("/src/assets/logo.svg"));
        assert_eq!(ctx.target_path(), PathBuf::from("/dist/assets/brand.svg"));
    }

    #[test]
    fn test_descend() {
        let ctx = level().entry("icons");
        let child = DirLevel::descend(&ctx, "glyphs");

        assert_eq!(child.from, PathBuf::from("/src/assets/icons"));
        assert_eq!(child.to, PathBuf::from("/dist/assets/glyphs"));
        assert_eq!(child.relative, PathBuf::from("assets/icons"));
    }
}
