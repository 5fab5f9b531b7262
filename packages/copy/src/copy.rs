//! No-clobber file copying.
//!
//! Files are staged in a temporary file next to the target and moved into
//! place with a rename that refuses to replace an existing file, so two
//! writers racing for the same target never overwrite each other.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tempfile::{PathPersistError, TempPath};

use crate::error::CopyError;

/// Result of a copy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    /// The target was created.
    Created {
        /// Number of bytes written.
        bytes: u64,
    },
    /// Target already exists, operation skipped.
    Exists,
    /// Source does not exist, operation skipped.
    SourceNotFound,
}

/// Create a directory and all of its parents.
///
/// Succeeds if the directory already exists.
///
/// # Errors
///
/// * If the directory cannot be created
pub fn ensure_dir(path: &Path) -> Result<(), CopyError> {
    fs::create_dir_all(path).map_err(|e| CopyError::CreateDirError {
        path: path.to_path_buf(),
        io_error: e,
    })
}

/// Copy a single file.
///
/// Only copies if target doesn't exist. If another writer creates the target
/// while the copy is in flight, the copy is discarded and
/// [`CopyResult::Exists`] is returned.
///
/// # Arguments
///
/// * `source` - Source file path
/// * `target` - Target file path
///
/// # Errors
///
/// * If the parent directory cannot be created
/// * If the copy operation fails
pub fn copy_file(source: &Path, target: &Path) -> Result<CopyResult, CopyError> {
    log::debug!("Copying file: {} -> {}", source.display(), target.display());

    if !source.exists() {
        log::debug!("Source does not exist");
        return Ok(CopyResult::SourceNotFound);
    }

    if target.exists() {
        log::debug!("Target already exists");
        return Ok(CopyResult::Exists);
    }

    let copy_error = |e| CopyError::FileCopyError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error: e,
    };

    let staged = staging_file(target)
        .map_err(copy_error)?
        .into_temp_path();
    let bytes = copy_file_with_reflink(source, &staged, target)?;

    match persist_noclobber(staged, target) {
        Ok(true) => Ok(CopyResult::Created { bytes }),
        Ok(false) => Ok(CopyResult::Exists),
        Err(e) => Err(copy_error(e)),
    }
}

/// Write `contents` to a new file at `target`.
///
/// Used when a plugin supplied rewritten content for an entry. An existing
/// target is left untouched.
///
/// # Errors
///
/// * If the parent directory cannot be created
/// * If the file cannot be written
pub fn write_file(target: &Path, contents: &[u8]) -> Result<CopyResult, CopyError> {
    log::debug!("Writing {} byte(s) to {}", contents.len(), target.display());

    if target.exists() {
        log::debug!("Target already exists");
        return Ok(CopyResult::Exists);
    }

    let write_error = |e| CopyError::WriteError {
        path: target.to_path_buf(),
        io_error: e,
    };

    let mut staged = staging_file(target).map_err(write_error)?;
    staged.write_all(contents).map_err(write_error)?;

    match persist_noclobber(staged.into_temp_path(), target) {
        Ok(true) => {
            log::trace!("Wrote {}", target.display());
            Ok(CopyResult::Created {
                bytes: contents.len() as u64,
            })
        }
        Ok(false) => Ok(CopyResult::Exists),
        Err(e) => Err(write_error(e)),
    }
}

/// Rename a just-materialized entry at the destination.
///
/// Never replaces an existing `to`: returns `false` and leaves `from` where
/// it is when `to` already exists.
///
/// # Errors
///
/// * If the rename fails for any other reason
#[must_use = "returns false if the target already existed and nothing was renamed"]
pub fn rename_entry(from: &Path, to: &Path) -> Result<bool, CopyError> {
    log::debug!("Renaming {} -> {}", from.display(), to.display());

    let rename_error = |e| CopyError::RenameError {
        source_path: from.to_path_buf(),
        target_path: to.to_path_buf(),
        io_error: e,
    };

    match TempPath::from_path(from).persist_noclobber(to) {
        Ok(()) => Ok(true),
        Err(PathPersistError { error, path }) => {
            // Dropping the returned path would delete `from`.
            path.keep().map_err(|e| rename_error(e.error))?;

            if error.kind() == ErrorKind::AlreadyExists {
                log::debug!("{} already exists, not renaming", to.display());
                Ok(false)
            } else {
                Err(rename_error(error))
            }
        }
    }
}

/// Create an empty temporary file in the target's directory.
fn staging_file(target: &Path) -> io::Result<tempfile::NamedTempFile> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    tempfile::Builder::new()
        .prefix(".cpdirplus-")
        .tempfile_in(parent)
}

/// Move `staged` to `target` unless `target` exists.
///
/// Returns `false` when `target` already existed; `staged` is then removed.
fn persist_noclobber(staged: TempPath, target: &Path) -> io::Result<bool> {
    match staged.persist_noclobber(target) {
        Ok(()) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            log::debug!("Target {} appeared during the copy", target.display());
            Ok(false)
        }
        Err(e) => Err(e.error),
    }
}

/// Copy a single file into `staged`, trying reflink first then falling back to
/// regular copy.
fn copy_file_with_reflink(source: &Path, staged: &Path, target: &Path) -> Result<u64, CopyError> {
    let copy_error = |e| CopyError::FileCopyError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error: e,
    };

    // Reflinks are only created at new paths
    fs::remove_file(staged).map_err(copy_error)?;

    // Try reflink first (copy-on-write, instant on APFS/Btrfs/ReFS)
    match reflink_copy::reflink(source, staged) {
        Ok(()) => {
            log::trace!("Reflinked {} -> {}", source.display(), target.display());
            fs::metadata(staged).map(|m| m.len()).map_err(copy_error)
        }
        Err(_) => {
            let bytes = fs::copy(source, staged).map_err(copy_error)?;
            log::trace!("Copied {} -> {}", source.display(), target.display());
            Ok(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_creates_new() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");

        fs::write(&source, "hello world").unwrap();

        let result = copy_file(&source, &target).unwrap();

        assert_eq!(result, CopyResult::Created { bytes: 11 });
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello world");
    }

    #[test]
    fn test_copy_file_exists() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");

        fs::write(&source, "source content").unwrap();
        fs::write(&target, "target content").unwrap();

        let result = copy_file(&source, &target).unwrap();

        assert_eq!(result, CopyResult::Exists);
        assert_eq!(fs::read_to_string(&target).unwrap(), "target content");
    }

    #[test]
    fn test_copy_file_source_not_found() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("nonexistent.txt");
        let target = dir.path().join("target.txt");

        let result = copy_file(&source, &target).unwrap();

        assert_eq!(result, CopyResult::SourceNotFound);
        assert!(!target.exists());
    }

    #[test]
    fn test_copy_file_creates_parent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("a/b/target.txt");

        fs::write(&source, "nested").unwrap();

        copy_file(&source, &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "nested");
    }

    #[test]
    fn test_write_file_never_clobbers() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.txt");

        assert_eq!(
            write_file(&target, b"first").unwrap(),
            CopyResult::Created { bytes: 5 }
        );
        assert_eq!(write_file(&target, b"second").unwrap(), CopyResult::Exists);
        assert_eq!(fs::read_to_string(&target).unwrap(), "first");
    }

    #[test]
    fn test_rename_entry() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");

        fs::write(&from, "content").unwrap();
        assert!(rename_entry(&from, &to).unwrap());

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_ensure_dir_existing() {
        let dir = TempDir::new().unwrap();
        ensure_dir(dir.path()).unwrap();
        ensure_dir(&dir.path().join("x/y")).unwrap();
        assert!(dir.path().join("x/y").is_dir());
    }

    #[test]
    fn test_rename_entry_keeps_existing_target() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");

        fs::write(&from, "new").unwrap();
        fs::write(&to, "old").unwrap();

        assert!(!rename_entry(&from, &to).unwrap());
        assert_eq!(fs::read_to_string(&from).unwrap(), "new");
        assert_eq!(fs::read_to_string(&to).unwrap(), "old");
    }

    #[test]
    fn test_copy_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let out = dir.path().join("out");

        fs::write(&source, "x").unwrap();
        copy_file(&source, &out.join("a.txt")).unwrap();
        write_file(&out.join("b.txt"), b"y").unwrap();
        copy_file(&source, &out.join("a.txt")).unwrap();

        let mut names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_racing_copies_create_target_once() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target.txt");
        let sources: Vec<_> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("source{i}.txt"));
                fs::write(&path, format!("source {i}")).unwrap();
                path
            })
            .collect();

        let barrier = std::sync::Barrier::new(sources.len());
        let created = std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let barrier = &barrier;
                    let target = &target;
                    scope.spawn(move || {
                        barrier.wait();
                        copy_file(source, target).unwrap()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|result| matches!(result, CopyResult::Created { .. }))
                .count()
        });

        assert_eq!(created, 1);
        assert!(fs::read_to_string(&target).unwrap().starts_with("source "));
    }
}
