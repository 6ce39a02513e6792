//! Crypto option normalization and auto-detection.
//!
//! Normalization fills defaults and validates caller-specified fields.
//! Detection inspects an existing integrity object's hash strings to recover
//! the algorithms, encoding and verbosity it was built with; it is used only
//! when the caller omits options while checking against an existing payload,
//! and it never fails — ambiguous fields stay unset and fall back to the
//! defaults.

use crate::crypto::{self, Algorithm, Encoding};
use crate::error::IntegrityError;
use crate::exclude::ExclusionFilter;
use crate::object::{HashEntry, IntegrityObject};
use crate::tree::path::base_name;
use std::collections::BTreeMap;
use std::path::Path;

/// Default digest for file contents: fast and short.
pub const DEFAULT_FILE_ALGORITHM: Algorithm = Algorithm::Sha1;
/// Default digest for directory structure: stronger and longer.
pub const DEFAULT_DIR_ALGORITHM: Algorithm = Algorithm::Sha512;
/// Default digest text encoding.
pub const DEFAULT_ENCODING: Encoding = Encoding::Base64;

/// Caller-facing options. Every field is independently defaultable.
#[derive(Debug, Clone, Default)]
pub struct IntegrityOptions {
    /// Digest algorithm tag for file contents.
    pub file_algorithm: Option<String>,
    /// Digest algorithm tag for directory rollups.
    pub dir_algorithm: Option<String>,
    /// Digest text encoding: `hex`, `base64` or `latin1`.
    pub encoding: Option<String>,
    /// Raw exclusion pattern lines, `!`-negations included.
    pub exclude: Vec<String>,
    /// Retain per-child hashes in directory entries.
    pub verbose: Option<bool>,
}

impl IntegrityOptions {
    /// Fill unset crypto fields from detection results. Caller-specified
    /// fields always win.
    pub fn merge_detected(&self, detected: DetectedOptions) -> Self {
        Self {
            file_algorithm: self
                .file_algorithm
                .clone()
                .or(detected.file_algorithm),
            dir_algorithm: self.dir_algorithm.clone().or(detected.dir_algorithm),
            encoding: self.encoding.clone().or(detected.encoding),
            exclude: self.exclude.clone(),
            verbose: self.verbose.or(detected.verbose),
        }
    }
}

/// Fully resolved options, ready for hashing.
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    pub file_algorithm: Algorithm,
    pub dir_algorithm: Algorithm,
    pub encoding: Encoding,
    pub filter: ExclusionFilter,
    pub verbose: bool,
}

impl Default for NormalizedOptions {
    fn default() -> Self {
        Self {
            file_algorithm: DEFAULT_FILE_ALGORITHM,
            dir_algorithm: DEFAULT_DIR_ALGORITHM,
            encoding: DEFAULT_ENCODING,
            filter: ExclusionFilter::empty(),
            verbose: false,
        }
    }
}

/// Options recovered from an existing integrity object. Unset fields mean
/// the detector could not tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedOptions {
    pub file_algorithm: Option<String>,
    pub dir_algorithm: Option<String>,
    pub encoding: Option<String>,
    pub verbose: Option<bool>,
}

/// Validate caller-specified fields and fill defaults.
pub fn normalize(options: &IntegrityOptions) -> Result<NormalizedOptions, IntegrityError> {
    let file_algorithm = match &options.file_algorithm {
        Some(name) => crypto::require_algorithm(name)?,
        None => DEFAULT_FILE_ALGORITHM,
    };
    let dir_algorithm = match &options.dir_algorithm {
        Some(name) => crypto::require_algorithm(name)?,
        None => DEFAULT_DIR_ALGORITHM,
    };
    let encoding = match &options.encoding {
        Some(name) => crypto::require_encoding(name)?,
        None => DEFAULT_ENCODING,
    };
    let filter = ExclusionFilter::new(&options.exclude)?;

    Ok(NormalizedOptions {
        file_algorithm,
        dir_algorithm,
        encoding,
        filter,
        verbose: options.verbose.unwrap_or(false),
    })
}

/// Recover crypto options from an existing integrity object.
///
/// Takes the entry for `basename(target)`, splits its hash string on the
/// first `-`, classifies the digest text to recover the encoding, and walks
/// the verbose tree for the file algorithm when the target is a directory.
/// Tags not in the registry are left unset.
pub fn detect(candidate: &IntegrityObject, target: &Path) -> DetectedOptions {
    let name = base_name(target);
    let Some(entry) = candidate.hashes.get(&name) else {
        return DetectedOptions::default();
    };

    let mut detected = DetectedOptions {
        verbose: Some(matches!(entry, HashEntry::Verbose(_))),
        ..DetectedOptions::default()
    };

    let Some((tag, digest)) = crypto::split_hash_string(entry.hash_str()) else {
        return detected;
    };
    detected.encoding = crypto::classify_encoding(digest).map(|e| e.name().to_string());

    let top_tag = Algorithm::from_name(tag).map(|a| a.name().to_string());
    if target.is_dir() {
        detected.dir_algorithm = top_tag.clone();
        detected.file_algorithm = match entry.contents() {
            Some(contents) => leaf_file_tag(contents),
            // Non-verbose: the only tag available is the top-level one.
            None => top_tag,
        };
    } else {
        detected.file_algorithm = top_tag;
    }
    detected
}

/// Descend a verbose tree to the first plain-string leaf and parse its tag.
fn leaf_file_tag(contents: &BTreeMap<String, HashEntry>) -> Option<String> {
    for entry in contents.values() {
        match entry {
            HashEntry::Hash(hash) => {
                if let Some((tag, _)) = crypto::split_hash_string(hash) {
                    if let Some(algorithm) = Algorithm::from_name(tag) {
                        return Some(algorithm.name().to_string());
                    }
                }
            }
            HashEntry::Verbose(verbose) => {
                if let Some(tag) = leaf_file_tag(&verbose.contents) {
                    return Some(tag);
                }
            }
        }
    }
    None
}
