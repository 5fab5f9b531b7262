//! Pattern compilation and resolution against a base directory.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::GlobError;

/// Compile a list of patterns into a single [`GlobSet`].
///
/// `*` never crosses a path separator; use `**` to match across directories.
/// A leading `./` is ignored so `./src/**` and `src/**` are equivalent.
///
/// # Errors
///
/// * If any pattern is not a valid glob
pub fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, GlobError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let raw = pattern.as_ref();
        let normalized = raw.strip_prefix("./").unwrap_or(raw);
        let glob = GlobBuilder::new(normalized)
            .literal_separator(true)
            .build()
            .map_err(|source| GlobError::InvalidPattern {
                pattern: raw.to_string(),
                source,
            })?;
        builder.add(glob);
    }

    builder.build().map_err(|source| GlobError::InvalidPattern {
        pattern: patterns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", "),
        source,
    })
}

/// Resolve patterns against `base`, returning every matching path relative to it.
///
/// Both files and directories are candidates. Hidden entries are walked and
/// symlinks are not followed. The result carries no ordering guarantee that
/// callers should depend on; use it for membership only.
///
/// # Arguments
///
/// * `base` - Directory the patterns are relative to
/// * `patterns` - Patterns to match; an empty slice matches nothing
///
/// # Errors
///
/// * If any pattern is invalid
/// * If the directory walk fails
pub fn resolve_matches<S: AsRef<str>>(
    base: &Path,
    patterns: &[S],
) -> Result<BTreeSet<PathBuf>, GlobError> {
    let mut matched = BTreeSet::new();

    if patterns.is_empty() {
        return Ok(matched);
    }

    let set = build_glob_set(patterns)?;

    log::debug!(
        "Resolving {} pattern(s) against {}",
        patterns.len(),
        base.display()
    );

    for entry in jwalk::WalkDir::new(base)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
    {
        let entry = entry.map_err(|e| GlobError::Walk {
            path: base.to_path_buf(),
            message: e.to_string(),
        })?;

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(base) else {
            continue;
        };

        // The root itself is never a candidate
        if relative.as_os_str().is_empty() {
            continue;
        }

        if set.is_match(relative) {
            matched.insert(relative.to_path_buf());
        }
    }

    log::debug!("Matched {} path(s)", matched.len());

    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/deep")).unwrap();
        fs::write(dir.path().join("x.txt"), "x").unwrap();
        fs::write(dir.path().join("y.log"), "y").unwrap();
        fs::write(dir.path().join("sub/z.txt"), "z").unwrap();
        fs::write(dir.path().join("sub/deep/w.txt"), "w").unwrap();
        dir
    }

    #[test]
    fn test_resolve_matches_all() {
        let dir = fixture();
        let matched = resolve_matches(dir.path(), &["**/*"]).unwrap();

        assert!(matched.contains(Path::new("x.txt")));
        assert!(matched.contains(Path::new("y.log")));
        assert!(matched.contains(Path::new("sub")));
        assert!(matched.contains(Path::new("sub/z.txt")));
        assert!(matched.contains(Path::new("sub/deep/w.txt")));
        assert_eq!(matched.len(), 6);
    }

    #[test]
    fn test_resolve_matches_extension() {
        let dir = fixture();
        let matched = resolve_matches(dir.path(), &["**/*.txt"]).unwrap();

        assert!(matched.contains(Path::new("x.txt")));
        assert!(matched.contains(Path::new("sub/z.txt")));
        assert!(matched.contains(Path::new("sub/deep/w.txt")));
        assert!(!matched.contains(Path::new("y.log")));
        assert!(!matched.contains(Path::new("sub")));
    }

    #[test]
    fn test_single_star_stays_in_component() {
        let dir = fixture();
        let matched = resolve_matches(dir.path(), &["*.txt"]).unwrap();

        assert!(matched.contains(Path::new("x.txt")));
        assert!(!matched.contains(Path::new("sub/z.txt")));
    }

    #[test]
    fn test_match_all_includes_dotfiles() {
        let dir = fixture();
        fs::write(dir.path().join(".env"), "KEY=1").unwrap();
        fs::create_dir(dir.path().join(".config")).unwrap();
        fs::write(dir.path().join(".config/app.toml"), "").unwrap();

        let matched = resolve_matches(dir.path(), &["**/*"]).unwrap();

        assert!(matched.contains(Path::new(".env")));
        assert!(matched.contains(Path::new(".config")));
        assert!(matched.contains(Path::new(".config/app.toml")));
    }

    #[test]
    fn test_resolve_matches_empty_patterns() {
        let dir = fixture();
        let none: &[&str] = &[];
        assert!(resolve_matches(dir.path(), none).unwrap().is_empty());
    }

    #[test]
    fn test_leading_dot_slash_is_ignored() {
        let dir = fixture();
        let matched = resolve_matches(dir.path(), &["./sub/*.txt"]).unwrap();

        assert_eq!(matched.len(), 1);
        assert!(matched.contains(Path::new("sub/z.txt")));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = fixture();
        let err = resolve_matches(dir.path(), &["[unclosed"]).unwrap_err();
        assert!(matches!(err, GlobError::InvalidPattern { .. }));
    }
}
