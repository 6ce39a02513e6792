//! Verification engine: whole-object equality and path-anchored subtree
//! matching.
//!
//! The subtree strategy lets one stored integrity object validate checks
//! issued against any sub-path it covers, without re-hashing the original
//! root. It is an explicit loop over candidate anchor indices — Searching,
//! Verifying, Descending — with early exit on the first verified match.

use crate::error::IntegrityError;
use crate::object::{HashEntry, IntegrityObject};
use crate::options::NormalizedOptions;
use crate::tree::hasher;
use crate::tree::path::{canonicalize_path, named_segments, path_from_segments};
use std::path::Path;
use tracing::{debug, trace};

/// Compare a freshly computed object against a stored candidate.
///
/// Fails `IncompatibleVersion` when the versions differ. Otherwise passes if
/// either the canonical whole-object comparison or the path-anchored subtree
/// match succeeds. Content mismatch is a normal `false`, never an error.
pub fn verify(
    fresh: &IntegrityObject,
    candidate: &IntegrityObject,
    target: &Path,
    options: &NormalizedOptions,
) -> Result<bool, IntegrityError> {
    if fresh.version != candidate.version {
        return Err(IntegrityError::IncompatibleVersion {
            expected: fresh.version.clone(),
            actual: candidate.version.clone(),
        });
    }

    // BTreeMap keys are always sorted, so equality is the canonical
    // structural comparison.
    if fresh.hashes == candidate.hashes {
        debug!("verified by whole-object equality");
        return Ok(true);
    }

    subtree_match(fresh, candidate, target, options)
}

/// Path-anchored subtree matching.
///
/// Decomposes the target's canonical path into segments and scans from the
/// filesystem root downward for a segment present in the candidate's map.
/// From each anchor it walks toward the target, recomputing the real
/// directory rollup at every interior depth against the candidate node; any
/// disagreement or missing child advances the anchor search, so a name
/// collision deeper in the tree cannot produce a false anchor. A verified
/// plain-string node with segments remaining passes on the strength of its
/// rollup: the stored fingerprint covers the entire subtree.
fn subtree_match(
    fresh: &IntegrityObject,
    candidate: &IntegrityObject,
    target: &Path,
    options: &NormalizedOptions,
) -> Result<bool, IntegrityError> {
    let Ok(canonical) = canonicalize_path(target) else {
        return Ok(false);
    };
    let segments = named_segments(&canonical);
    let Some(last) = segments.len().checked_sub(1) else {
        return Ok(false);
    };

    let mut search_from = 0;
    'search: loop {
        // Searching: the next segment that exists as a candidate key.
        let Some(anchor) =
            (search_from..=last).find(|&i| candidate.hashes.contains_key(&segments[i]))
        else {
            return Ok(false);
        };
        search_from = anchor + 1;
        trace!(segment = %segments[anchor], depth = anchor, "trying anchor");

        let mut entry = &candidate.hashes[&segments[anchor]];

        // Verifying + Descending: interior depths between anchor and target.
        for depth in anchor..last {
            let real = path_from_segments(&canonical, depth + 1);
            match hasher::rollup(&real, &real, options)? {
                Some(recomputed) if recomputed == entry.hash_str() => {}
                _ => continue 'search,
            }
            match entry.contents() {
                Some(contents) => match contents.get(&segments[depth + 1]) {
                    Some(child) => entry = child,
                    None => continue 'search,
                },
                // Non-verbose anchor: the verified rollup already covers the
                // whole subtree containing the target.
                None => {
                    debug!(segment = %segments[depth], "verified by rolled-up anchor");
                    return Ok(true);
                }
            }
        }

        // Matched / Mismatched: the target's own basename.
        let Some(fresh_entry) = fresh.hashes.get(&segments[last]) else {
            return Ok(false);
        };
        if entries_match(entry, fresh_entry) {
            debug!(segment = %segments[last], "verified by subtree anchor");
            return Ok(true);
        }
    }
}

/// Entries compare by rolled-up hash string: string-to-string,
/// string-to-verbose, or verbose-to-verbose by `hash` field.
fn entries_match(candidate: &HashEntry, fresh: &HashEntry) -> bool {
    candidate.hash_str() == fresh.hash_str()
}
