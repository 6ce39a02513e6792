//! The versioned integrity object: schema, validation and serialization.
//!
//! The serialized form is `{"version":"1","hashes":{...}}` where every hash
//! entry is either a plain `"<algorithm>-<encoded-digest>"` string or a
//! verbose `{"hash": ..., "contents": {...}}` node. Maps are `BTreeMap`, so
//! key order in memory and on disk is always canonical.

use crate::error::IntegrityError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Schema version produced by this crate.
pub const CURRENT_VERSION: &str = "1";

/// File name used when an integrity object is persisted next to the content
/// it covers. Never hashed as ordinary content.
pub const MANIFEST_FILENAME: &str = ".integrity.json";

/// Versions this crate can validate, keyed by the `version` discriminator.
const KNOWN_VERSIONS: &[&str] = &[CURRENT_VERSION];

/// A single hash entry: a rolled-up hash string, or a verbose node retaining
/// per-child hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HashEntry {
    Hash(String),
    Verbose(VerboseHashEntry),
}

impl HashEntry {
    /// The rolled-up hash string of this entry, whichever shape it has.
    pub fn hash_str(&self) -> &str {
        match self {
            HashEntry::Hash(hash) => hash,
            HashEntry::Verbose(verbose) => &verbose.hash,
        }
    }

    /// Immediate children, when this entry is verbose.
    pub fn contents(&self) -> Option<&BTreeMap<String, HashEntry>> {
        match self {
            HashEntry::Hash(_) => None,
            HashEntry::Verbose(verbose) => Some(&verbose.contents),
        }
    }
}

/// A verbose directory node: its own rolled-up hash plus per-child entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerboseHashEntry {
    pub hash: String,
    pub contents: BTreeMap<String, HashEntry>,
}

/// A versioned integrity fingerprint for a file or directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityObject {
    pub version: String,
    pub hashes: BTreeMap<String, HashEntry>,
}

impl IntegrityObject {
    /// An object with no hashes, as produced when the target does not exist
    /// or everything was excluded.
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            hashes: BTreeMap::new(),
        }
    }

    /// An object holding a single named entry.
    pub fn single(name: impl Into<String>, entry: HashEntry) -> Self {
        let mut hashes = BTreeMap::new();
        hashes.insert(name.into(), entry);
        Self {
            version: CURRENT_VERSION.to_string(),
            hashes,
        }
    }

    /// Parse and schema-validate a serialized integrity object.
    pub fn from_json(text: &str) -> Result<Self, IntegrityError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| IntegrityError::SchemaValidationFailed(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate a parsed JSON value against the schema for its version.
    pub fn from_value(value: &Value) -> Result<Self, IntegrityError> {
        validate_schema(value)?;
        serde_json::from_value(value.clone())
            .map_err(|e| IntegrityError::SchemaValidationFailed(e.to_string()))
    }

    /// Serialize to the canonical pretty-printed JSON form.
    pub fn to_json(&self) -> String {
        // Serialization of string-keyed BTreeMaps cannot fail.
        serde_json::to_string_pretty(self).expect("integrity object serializes")
    }

    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, IntegrityError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write this object as `<dir>/.integrity.json`.
    pub fn save(&self, dir: &Path) -> Result<(), IntegrityError> {
        let path = dir.join(MANIFEST_FILENAME);
        fs::write(path, format!("{}\n", self.to_json()))?;
        Ok(())
    }
}

/// Structural validation, keyed by the `version` discriminator. Unknown
/// versions fail `InvalidManifestVersion`; a known version with a malformed
/// body fails `SchemaValidationFailed`.
fn validate_schema(value: &Value) -> Result<(), IntegrityError> {
    let object = value
        .as_object()
        .ok_or_else(|| IntegrityError::SchemaValidationFailed("not a JSON object".to_string()))?;

    let version = object
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            IntegrityError::SchemaValidationFailed("missing string field `version`".to_string())
        })?;
    if !KNOWN_VERSIONS.contains(&version) {
        return Err(IntegrityError::InvalidManifestVersion(version.to_string()));
    }

    let hashes = object.get("hashes").and_then(Value::as_object).ok_or_else(|| {
        IntegrityError::SchemaValidationFailed("missing object field `hashes`".to_string())
    })?;

    for key in object.keys() {
        if key != "version" && key != "hashes" {
            return Err(IntegrityError::SchemaValidationFailed(format!(
                "unexpected field `{}`",
                key
            )));
        }
    }

    for (name, entry) in hashes {
        validate_entry(name, entry)?;
    }
    Ok(())
}

fn validate_entry(name: &str, entry: &Value) -> Result<(), IntegrityError> {
    match entry {
        Value::String(_) => Ok(()),
        Value::Object(fields) => {
            let hash_ok = fields.get("hash").map(Value::is_string).unwrap_or(false);
            let contents = fields.get("contents").and_then(Value::as_object);
            if !hash_ok || contents.is_none() || fields.len() != 2 {
                return Err(IntegrityError::SchemaValidationFailed(format!(
                    "entry `{}` is not a hash string or verbose node",
                    name
                )));
            }
            for (child_name, child) in contents.unwrap() {
                validate_entry(child_name, child)?;
            }
            Ok(())
        }
        _ => Err(IntegrityError::SchemaValidationFailed(format!(
            "entry `{}` is not a hash string or verbose node",
            name
        ))),
    }
}
