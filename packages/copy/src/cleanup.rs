//! Source cleanup for move transfers.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CopyError;

/// Remove a source file that has been transferred.
///
/// A file that is already gone is not an error.
///
/// # Errors
///
/// * If the file exists but cannot be removed
pub fn remove_file(path: &Path) -> Result<(), CopyError> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::trace!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CopyError::RemoveError {
            path: path.to_path_buf(),
            io_error: e,
        }),
    }
}

/// Remove every directory in `dirs` that is empty, deepest first.
///
/// Directories that still hold entries are kept. Returns the number of
/// directories removed.
///
/// # Errors
///
/// * If an empty directory cannot be removed
pub fn prune_empty_dirs<I>(dirs: I) -> Result<u64, CopyError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    dirs.dedup();

    let mut removed = 0;

    for dir in dirs {
        match fs::remove_dir(&dir) {
            Ok(()) => {
                log::debug!("Pruned empty directory {}", dir.display());
                removed += 1;
            }
            Err(e) if matches!(e.kind(), ErrorKind::DirectoryNotEmpty | ErrorKind::NotFound) => {}
            Err(e) => {
                return Err(CopyError::RemoveError {
                    path: dir,
                    io_error: e,
                });
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_file_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        remove_file(&dir.path().join("missing.txt")).unwrap();
    }

    #[test]
    fn test_prune_keeps_non_empty() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("a/empty");
        let full = dir.path().join("b");
        fs::create_dir_all(&empty).unwrap();
        fs::create_dir_all(&full).unwrap();
        fs::write(full.join("keep.txt"), "keep").unwrap();

        let removed = prune_empty_dirs(vec![
            dir.path().join("a"),
            empty.clone(),
            full.clone(),
        ])
        .unwrap();

        assert_eq!(removed, 2);
        assert!(!dir.path().join("a").exists());
        assert!(full.join("keep.txt").exists());
    }
}
