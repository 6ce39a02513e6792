//! Create/check facade and the candidate-payload boundary.
//!
//! `create` wraps the tree-hash builder's output into a versioned integrity
//! object. `check` accepts the stored side in any of its serialized shapes —
//! a filesystem path (directory implying a manifest inside, or a manifest
//! file), a JSON string, or a bare hash string — detects whatever crypto
//! options the caller omitted from the stored hashes, recomputes a fresh
//! object and hands both to the verification engine.

use crate::error::IntegrityError;
use crate::object::{HashEntry, IntegrityObject, MANIFEST_FILENAME};
use crate::options::{self, IntegrityOptions};
use crate::tree::hasher;
use crate::tree::path::{base_name, canonicalize_path};
use crate::verify;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Compute a fresh integrity object for a file or directory tree.
///
/// A path that is neither a regular file nor a directory (including a
/// missing one) yields an object with empty hashes rather than an error, as
/// does a directory whose admitted file set is empty after exclusion.
#[instrument(skip(options), fields(target = %path.display()))]
pub fn create(path: &Path, options: &IntegrityOptions) -> Result<IntegrityObject, IntegrityError> {
    let normalized = options::normalize(options)?;

    let Ok(metadata) = fs::metadata(path) else {
        debug!("target does not exist; producing empty object");
        return Ok(IntegrityObject::empty());
    };
    // Resolve `.`-style paths so the map key is the real basename.
    let path = canonicalize_path(path)?;

    let entry = if metadata.is_file() {
        Some(HashEntry::Hash(hasher::hash_file(&path, &normalized)?))
    } else if metadata.is_dir() {
        hasher::hash_directory(&path, &normalized)?
    } else {
        debug!("target is neither file nor directory; producing empty object");
        None
    };

    Ok(match entry {
        Some(entry) => IntegrityObject::single(base_name(&path), entry),
        None => IntegrityObject::empty(),
    })
}

/// Check a path against a stored integrity payload in serialized form.
///
/// Unresolvable payloads (empty string, directory without a manifest) are a
/// normal `false`; a payload that resolves to a manifest or JSON object but
/// fails schema validation raises.
#[instrument(skip(payload, options), fields(target = %path.display()))]
pub fn check(
    path: &Path,
    payload: &str,
    options: &IntegrityOptions,
) -> Result<bool, IntegrityError> {
    let path = resolved_target(path);
    match resolve_candidate(payload, &path)? {
        Some(candidate) => check_object(&path, &candidate, options),
        None => Ok(false),
    }
}

/// Check a path against an already-parsed integrity object.
pub fn check_object(
    path: &Path,
    candidate: &IntegrityObject,
    options: &IntegrityOptions,
) -> Result<bool, IntegrityError> {
    let path = resolved_target(path);
    let detected = options::detect(candidate, &path);
    let merged = options.merge_detected(detected);
    let fresh = create(&path, &merged)?;
    let normalized = options::normalize(&merged)?;
    verify::verify(&fresh, candidate, &path, &normalized)
}

/// Canonicalize the target when it exists; a missing target keeps its given
/// form and naturally fails the strategies that need the filesystem.
fn resolved_target(path: &Path) -> PathBuf {
    canonicalize_path(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve a candidate payload into an integrity object.
///
/// Interpretation order: an existing filesystem path, then a JSON object
/// string, then a bare hash string wrapped into a synthetic single-entry
/// object keyed by the target's basename.
fn resolve_candidate(
    payload: &str,
    target: &Path,
) -> Result<Option<IntegrityObject>, IntegrityError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let as_path = Path::new(trimmed);
    if let Ok(metadata) = fs::metadata(as_path) {
        if metadata.is_dir() {
            let manifest = as_path.join(MANIFEST_FILENAME);
            if !manifest.is_file() {
                return Ok(None);
            }
            return IntegrityObject::load(&manifest).map(Some);
        }
        if metadata.is_file() {
            return IntegrityObject::load(as_path).map(Some);
        }
        return Err(IntegrityError::InvalidPathKind(as_path.to_path_buf()));
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if value.is_object() {
            return IntegrityObject::from_value(&value).map(Some);
        }
        if let Some(hash) = value.as_str() {
            return Ok(Some(synthetic_object(hash, target)));
        }
        return Ok(None);
    }

    Ok(Some(synthetic_object(trimmed, target)))
}

/// Wrap a bare hash string into a single-entry object keyed by the target's
/// basename.
fn synthetic_object(hash: &str, target: &Path) -> IntegrityObject {
    IntegrityObject::single(base_name(target), HashEntry::Hash(hash.to_string()))
}
