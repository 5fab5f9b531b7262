//! Recursive, parallel directory traversal.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cpdirplus_copy::{
    CopyProgress, CopyResult, TransferStats, copy_file, ensure_dir, rename_entry, write_file,
};
use cpdirplus_glob::MatchSets;
use rayon::prelude::*;
use regex::Regex;

use crate::completion::CompletionTracker;
use crate::context::{DirLevel, EntryContext};
use crate::error::OperationError;
use crate::pipeline::Pipeline;

/// Sources materialized by a move transfer, removed once the tree completes.
#[derive(Debug, Default)]
pub(crate) struct MoveLedger {
    files: Mutex<Vec<PathBuf>>,
    dirs: Mutex<Vec<PathBuf>>,
}

impl MoveLedger {
    fn record_file(&self, path: PathBuf) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    fn record_dir(&self, path: PathBuf) {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    /// Remove recorded source files, then every recorded directory (and
    /// `root`) that is left empty. Returns the number of files removed.
    pub fn clean_up(self, root: &Path) -> Result<u64, OperationError> {
        let files = self.files.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut dirs = self.dirs.into_inner().unwrap_or_else(PoisonError::into_inner);

        for file in &files {
            cpdirplus_copy::remove_file(file)?;
        }

        dirs.push(root.to_path_buf());
        let pruned = cpdirplus_copy::prune_empty_dirs(dirs)?;

        log::debug!(
            "Removed {} moved source file(s) and {} empty director(ies)",
            files.len(),
            pruned
        );

        Ok(files.len() as u64)
    }
}

/// State shared by every directory level of one transfer.
pub(crate) struct Engine<'a> {
    pub matches: &'a MatchSets,
    pub test: Option<&'a Regex>,
    pub pipeline: &'a Pipeline,
    pub stats: &'a TransferStats,
    pub on_progress: &'a (dyn Fn(&CopyProgress) + Sync),
    pub ledger: Option<&'a MoveLedger>,
    /// Destination root, never descended into when it lives inside the source.
    pub destination: &'a Path,
}

impl Engine<'_> {
    /// Copy one directory level, recursing into admitted subdirectories.
    ///
    /// `on_done` fires once every admitted entry of this level has been
    /// processed, immediately if there are none.
    pub fn copy_dir<'d>(
        &self,
        level: &DirLevel,
        on_done: impl FnOnce() + Send + 'd,
    ) -> Result<(), OperationError> {
        ensure_dir(&level.to)?;

        let names = self.admitted_entries(level)?;

        log::debug!(
            "Processing {} entr(ies) of {}",
            names.len(),
            level.from.display()
        );

        let tracker = CompletionTracker::new(names.len(), on_done);

        names.par_iter().try_for_each(|name| {
            self.process_entry(level, name)?;
            tracker.record();
            Ok(())
        })
    }

    /// Enumerate `level.from`, keeping entries that pass include/exclude and
    /// the name test.
    fn admitted_entries(&self, level: &DirLevel) -> Result<Vec<String>, OperationError> {
        let read_dir_error = |source| OperationError::ReadDir {
            path: level.from.clone(),
            source,
        };

        let mut admitted = Vec::new();

        for entry in fs::read_dir(&level.from).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let path = entry.path();

            if path == self.destination {
                log::debug!("Not descending into destination {}", path.display());
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                log::warn!("Skipping entry with a non UTF-8 name: {}", path.display());
                self.stats.record_filtered();
                continue;
            };

            let is_dir = entry
                .file_type()
                .map_err(|source| OperationError::Metadata {
                    path: path.clone(),
                    source,
                })?
                .is_dir();

            let relative = level.relative.join(&name);

            if !self.matches.admits(&relative, is_dir) {
                log::trace!("Filtered {}", relative.display());
                self.stats.record_filtered();
                continue;
            }

            if self.test.is_some_and(|test| !test.is_match(&name)) {
                log::trace!("{} failed the name test", relative.display());
                self.stats.record_filtered();
                continue;
            }

            admitted.push(name);
        }

        Ok(admitted)
    }

    fn process_entry(&self, level: &DirLevel, name: &str) -> Result<(), OperationError> {
        let Some(ctx) = self.pipeline.run(level.entry(name))? else {
            self.stats.record_dropped();
            return Ok(());
        };

        let source = ctx.source_path();
        let metadata = fs::metadata(&source).map_err(|e| OperationError::Metadata {
            path: source.clone(),
            source: e,
        })?;
        let resolved = ctx.rename_files.resolve(&ctx.filename).to_string();

        if metadata.is_dir() {
            let child = DirLevel::descend(&ctx, &resolved);
            let relative = child.relative.clone();

            self.copy_dir(&child, move || {
                log::debug!("Finished directory {}", relative.display());
            })?;

            self.stats.record_directory();
            if let Some(ledger) = self.ledger {
                ledger.record_dir(source);
            }
        } else {
            self.materialize_file(&ctx, source, &resolved)?;
        }

        Ok(())
    }

    /// Copy (or write) a file under its renamed name without clobbering.
    fn materialize_file(
        &self,
        ctx: &EntryContext,
        source: PathBuf,
        resolved: &str,
    ) -> Result<(), OperationError> {
        let staged = ctx.target_path();
        let renaming = resolved != ctx.filename;
        let finished = ctx.to.join(resolved);

        // A file left under the pre-rename name only needs its rename.
        if renaming && staged.exists() {
            self.stats.record_existing();
            if rename_entry(&staged, &finished)? {
                self.stats.record_renamed();
            } else {
                log::debug!("{} already exists, leaving it untouched", finished.display());
            }
            return Ok(());
        }

        // Renamed files are materialized straight under their final name.
        let target = if renaming { &finished } else { &staged };

        let result = match &ctx.contents {
            Some(bytes) => write_file(target, bytes)?,
            None => copy_file(&source, target)?,
        };

        match result {
            CopyResult::Created { bytes } => {
                self.stats.record_copied(bytes);
                if renaming {
                    self.stats.record_renamed();
                }
                (self.on_progress)(
                    &self
                        .stats
                        .snapshot(Some(ctx.relative_path().to_string_lossy().to_string())),
                );
                if let Some(ledger) = self.ledger {
                    ledger.record_file(source);
                }
            }
            CopyResult::Exists => {
                log::debug!("{} already exists, leaving it untouched", target.display());
                self.stats.record_existing();
            }
            CopyResult::SourceNotFound => {
                return Err(OperationError::Metadata {
                    path: source,
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
        }

        Ok(())
    }
}
