//! Target discovery: glob patterns relative to the repository root, minus
//! exclude patterns, or an explicit list of files.

use crate::error::{Error, Result};
use glob::{glob, MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::Pattern {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Path of `path` relative to `root`, with `/` separators.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = if path.is_absolute() {
        pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    rel.to_string_lossy().replace('\\', "/")
}

fn is_excluded(rel: &str, exclude: &[Pattern]) -> bool {
    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    exclude.iter().any(|p| p.matches_with(rel, opts))
}

/// Files under `root` matched by `patterns` and not by `exclude`.
///
/// Returned paths are absolute (joined onto `root`), deduplicated and sorted.
pub fn collect_files(root: &Path, patterns: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let exclude = compile(exclude)?;
    let mut found: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let abs = root.join(pat).to_string_lossy().to_string();
        let entries = glob(&abs).map_err(|e| Error::Pattern {
            pattern: pat.clone(),
            message: e.to_string(),
        })?;
        for entry in entries {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    tracing::debug!("skipping unreadable path: {e}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let rel = relative_display(root, &path);
            if is_excluded(&rel, &exclude) {
                tracing::trace!("excluded {rel}");
                continue;
            }
            found.insert(path);
        }
    }
    tracing::info!("collected {} file(s) from {} pattern(s)", found.len(), patterns.len());
    Ok(found.into_iter().collect())
}

/// Resolve explicit file arguments against `root`. Every file must exist.
pub fn explicit_files(root: &Path, files: &[String]) -> Result<Vec<PathBuf>> {
    let mut out = BTreeSet::new();
    for f in files {
        let p = root.join(f);
        if !p.is_file() {
            return Err(Error::MissingFile(p));
        }
        out.insert(p);
    }
    Ok(out.into_iter().collect())
}
