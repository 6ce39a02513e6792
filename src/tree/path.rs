//! Path canonicalization and naming utilities.

use crate::error::IntegrityError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize and normalize a path for deterministic handling.
///
/// Resolves symlinks, `..` and `.` (via dunce, for cross-platform behavior),
/// normalizes Unicode to NFC and strips trailing separators.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, IntegrityError> {
    let canonical = dunce::canonicalize(path)
        .map_err(|e| IntegrityError::InvalidPath(format!("Failed to canonicalize path: {}", e)))?;

    let path_str = canonical.to_string_lossy();
    let normalized: String = path_str.nfc().collect();

    let mut result = normalized;
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }

    Ok(PathBuf::from(result))
}

/// The basename used as a hash-map key and digest seed.
///
/// Falls back to the full lossy path for roots without a final component.
pub fn base_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Decompose a path into its named segments, root and prefix components
/// dropped. Used by the subtree-anchor search.
pub fn named_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Rebuild an absolute path from the first `count` named segments of
/// `reference`. Inverse of `named_segments` up to the reference's root.
pub fn path_from_segments(reference: &Path, count: usize) -> PathBuf {
    let mut result = PathBuf::new();
    for component in reference.components() {
        match component {
            Component::Normal(_) => break,
            other => result.push(other.as_os_str()),
        }
    }
    for segment in named_segments(reference).into_iter().take(count) {
        result.push(segment);
    }
    result
}
