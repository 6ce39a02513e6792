//! Deterministic filesystem walking for tree hashing.
//!
//! Ordering is externally observable: it feeds the directory digest, so every
//! listing here is sorted by file name. Symlinks are not followed.

use crate::error::IntegrityError;
use crate::exclude::ExclusionFilter;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An immediate child of a directory.
#[derive(Debug, Clone)]
pub enum Entry {
    File { path: PathBuf },
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path } | Entry::Directory { path } => path,
        }
    }
}

/// Immediate children of `dir`, sorted by file name, files and directories
/// interleaved. Symlinks and other non-regular entries are skipped.
pub fn sorted_entries(dir: &Path) -> Result<Vec<Entry>, IntegrityError> {
    let mut entries = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let file_type = dir_entry.file_type()?;
        let path = dir_entry.path();
        if file_type.is_file() {
            entries.push(Entry::File { path });
        } else if file_type.is_dir() {
            entries.push(Entry::Directory { path });
        }
    }
    entries.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
    Ok(entries)
}

/// The full recursive list of admitted descendant files of `dir`, in
/// traversal order. Exclusion is matched against paths relative to `root`,
/// the hashed root, which is threaded explicitly through every call.
pub fn included_files(
    dir: &Path,
    root: &Path,
    filter: &ExclusionFilter,
) -> Result<Vec<PathBuf>, IntegrityError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            IntegrityError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to walk directory: {}", e),
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if !filter.is_excluded(relative) {
            files.push(path);
        }
    }
    Ok(files)
}

/// Whether `dir` has at least one admitted descendant file. Directories that
/// come up empty after filtering are elided from hashes entirely.
pub fn has_included_files(
    dir: &Path,
    root: &Path,
    filter: &ExclusionFilter,
) -> Result<bool, IntegrityError> {
    Ok(!included_files(dir, root, filter)?.is_empty())
}
