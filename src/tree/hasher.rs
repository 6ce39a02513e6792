//! Tree-hash builder: file digests and directory rollups.
//!
//! A file digest is seeded with the file's basename before its bytes, so a
//! renamed-but-identical file never matches. A directory rollup is a single
//! running digest that absorbs, depth-first with name-sorted entries at each
//! level, every directory's basename on entry and every admitted file's
//! basename followed by its raw bytes. It is byte-absorption, not
//! hash-of-hashes: the rolled-up hash is not a function of the child hash
//! strings. Verbose mode builds the per-child map and then invokes the same
//! rollup for the node's own hash, so both modes agree at every directory.

use crate::crypto::Digestor;
use crate::error::IntegrityError;
use crate::object::{HashEntry, VerboseHashEntry, MANIFEST_FILENAME};
use crate::options::NormalizedOptions;
use crate::tree::path::base_name;
use crate::tree::walker::{self, Entry};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Hash a single regular file into `"<file_algorithm>-<encoded-digest>"`.
///
/// Fails with `NotAFile` for anything that is not a regular file and with
/// `ReservedName` for the integrity manifest itself.
pub fn hash_file(path: &Path, options: &NormalizedOptions) -> Result<String, IntegrityError> {
    if !path.is_file() {
        return Err(IntegrityError::NotAFile(path.to_path_buf()));
    }
    let name = base_name(path);
    if name == MANIFEST_FILENAME {
        return Err(IntegrityError::ReservedName(path.to_path_buf()));
    }

    let mut digestor = Digestor::new(options.file_algorithm);
    digestor.update(name.as_bytes());
    stream_into(&mut digestor, path)?;

    let encoded = options.encoding.encode(&digestor.finalize());
    trace!(file = %path.display(), "hashed file");
    Ok(format!("{}-{}", options.file_algorithm.name(), encoded))
}

/// Hash a batch of files, keyed by basename.
pub fn hash_files(
    paths: &[PathBuf],
    options: &NormalizedOptions,
) -> Result<BTreeMap<String, HashEntry>, IntegrityError> {
    let mut hashes = BTreeMap::new();
    for path in paths {
        hashes.insert(base_name(path), HashEntry::Hash(hash_file(path, options)?));
    }
    Ok(hashes)
}

/// Hash a directory tree.
///
/// Returns `None` when every descendant file was excluded (the directory is
/// elided from its parent map). Non-verbose mode yields the rolled-up hash
/// string; verbose mode yields a node with per-child entries whose own hash
/// is the identical rollup.
pub fn hash_directory(
    path: &Path,
    options: &NormalizedOptions,
) -> Result<Option<HashEntry>, IntegrityError> {
    if !path.is_dir() {
        return Err(IntegrityError::NotADirectory(path.to_path_buf()));
    }
    if options.verbose {
        Ok(hash_directory_verbose(path, path, options)?.map(HashEntry::Verbose))
    } else {
        Ok(rollup(path, path, options)?.map(HashEntry::Hash))
    }
}

/// Non-verbose rollup of `dir`, with exclusion matched relative to `root`.
/// `None` when the admitted descendant set is empty.
pub fn rollup(
    dir: &Path,
    root: &Path,
    options: &NormalizedOptions,
) -> Result<Option<String>, IntegrityError> {
    if !walker::has_included_files(dir, root, &options.filter)? {
        return Ok(None);
    }
    let mut digestor = Digestor::new(options.dir_algorithm);
    absorb_directory(&mut digestor, dir, root, options)?;
    let encoded = options.encoding.encode(&digestor.finalize());
    debug!(dir = %dir.display(), "rolled up directory");
    Ok(Some(format!("{}-{}", options.dir_algorithm.name(), encoded)))
}

/// Feed one directory level into the running digest: the directory's own
/// basename, then each admitted file's basename and raw bytes, recursing
/// into subdirectories in the same sorted pass. Subdirectories with no
/// admitted descendants contribute nothing, not even their name.
fn absorb_directory(
    digestor: &mut Digestor,
    dir: &Path,
    root: &Path,
    options: &NormalizedOptions,
) -> Result<(), IntegrityError> {
    digestor.update(base_name(dir).as_bytes());
    for entry in walker::sorted_entries(dir)? {
        match entry {
            Entry::File { path } => {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                if options.filter.is_excluded(relative) {
                    continue;
                }
                digestor.update(base_name(&path).as_bytes());
                stream_into(digestor, &path)?;
            }
            Entry::Directory { path } => {
                if walker::has_included_files(&path, root, &options.filter)? {
                    absorb_directory(digestor, &path, root, options)?;
                }
            }
        }
    }
    Ok(())
}

/// Verbose tree for `dir`: immediate files become plain leaves, immediate
/// subdirectories recurse, and the node's own hash is the non-verbose rollup
/// over the same root. `None` when the child map comes up empty.
fn hash_directory_verbose(
    dir: &Path,
    root: &Path,
    options: &NormalizedOptions,
) -> Result<Option<VerboseHashEntry>, IntegrityError> {
    let mut contents = BTreeMap::new();
    for entry in walker::sorted_entries(dir)? {
        match entry {
            Entry::File { path } => {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                if options.filter.is_excluded(relative) {
                    continue;
                }
                contents.insert(base_name(&path), HashEntry::Hash(hash_file(&path, options)?));
            }
            Entry::Directory { path } => {
                if let Some(child) = hash_directory_verbose(&path, root, options)? {
                    contents.insert(base_name(&path), HashEntry::Verbose(child));
                }
            }
        }
    }
    if contents.is_empty() {
        return Ok(None);
    }
    let hash = rollup(dir, root, options)?.unwrap_or_default();
    Ok(Some(VerboseHashEntry { hash, contents }))
}

/// Stream a file's bytes into the digest in fixed-size chunks. The handle is
/// scoped: open, stream, close on success or error.
fn stream_into(digestor: &mut Digestor, path: &Path) -> Result<(), IntegrityError> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        digestor.update(&buffer[..read]);
    }
    Ok(())
}
