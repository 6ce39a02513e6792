//! Digest backend: the supported algorithm registry and digest encodings.
//!
//! Hash strings have the form `"<algorithm>-<encoded-digest>"`. The algorithm
//! tag is one of the registry names below; the digest text is hex, base64 or
//! latin1 and can be classified back to its encoding by regex.

use crate::error::IntegrityError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use md5::Md5;
use regex::Regex;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::sync::OnceLock;

/// Digest algorithms the backend supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl Algorithm {
    /// All registry names, as they appear in hash strings.
    pub const NAMES: &'static [&'static str] =
        &["md5", "sha1", "sha256", "sha384", "sha512", "blake3"];

    /// Look up an algorithm by its hash-string tag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "md5" => Some(Algorithm::Md5),
            "sha1" => Some(Algorithm::Sha1),
            "sha256" => Some(Algorithm::Sha256),
            "sha384" => Some(Algorithm::Sha384),
            "sha512" => Some(Algorithm::Sha512),
            "blake3" => Some(Algorithm::Blake3),
            _ => None,
        }
    }

    /// The tag used in hash strings.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Blake3 => "blake3",
        }
    }
}

/// Digest text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Hex,
    Base64,
    Latin1,
}

impl Encoding {
    /// All encoding names accepted by the option normalizer.
    pub const NAMES: &'static [&'static str] = &["hex", "base64", "latin1"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hex" => Some(Encoding::Hex),
            "base64" => Some(Encoding::Base64),
            "latin1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
            Encoding::Latin1 => "latin1",
        }
    }

    /// Encode raw digest bytes as text.
    pub fn encode(self, digest: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(digest),
            Encoding::Base64 => BASE64.encode(digest),
            // Each byte maps to the Unicode code point of the same value.
            Encoding::Latin1 => digest.iter().map(|&b| b as char).collect(),
        }
    }
}

fn hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9a-f]{2})+$").unwrap())
}

fn base64_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{4}|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{2}==)$")
            .unwrap()
    })
}

/// Classify encoded digest text. Hex is tested first: every lowercase hex
/// digest is also a valid base64 string, the converse almost never holds.
/// Anything else is latin1. Empty input is unclassifiable.
pub fn classify_encoding(digest: &str) -> Option<Encoding> {
    if digest.is_empty() {
        return None;
    }
    if hex_re().is_match(digest) {
        return Some(Encoding::Hex);
    }
    if base64_re().is_match(digest) {
        return Some(Encoding::Base64);
    }
    Some(Encoding::Latin1)
}

/// Split a `"<algorithm>-<encoded-digest>"` string on the first `-`.
///
/// Purely lexical; the caller decides whether the tag is in the registry.
pub fn split_hash_string(hash: &str) -> Option<(&str, &str)> {
    let idx = hash.find('-')?;
    let (algorithm, rest) = hash.split_at(idx);
    if algorithm.is_empty() || rest.len() < 2 {
        return None;
    }
    Some((algorithm, &rest[1..]))
}

/// A streaming digest for one of the registry algorithms.
///
/// Explicit dispatch keeps the registry closed over crates the backend
/// actually links; `UnsupportedAlgorithm` covers every other tag.
pub enum Digestor {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Blake3(blake3::Hasher),
}

impl Digestor {
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Md5 => Digestor::Md5(Md5::new()),
            Algorithm::Sha1 => Digestor::Sha1(Sha1::new()),
            Algorithm::Sha256 => Digestor::Sha256(Sha256::new()),
            Algorithm::Sha384 => Digestor::Sha384(Sha384::new()),
            Algorithm::Sha512 => Digestor::Sha512(Sha512::new()),
            Algorithm::Blake3 => Digestor::Blake3(blake3::Hasher::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Digestor::Md5(h) => h.update(data),
            Digestor::Sha1(h) => h.update(data),
            Digestor::Sha256(h) => h.update(data),
            Digestor::Sha384(h) => h.update(data),
            Digestor::Sha512(h) => h.update(data),
            Digestor::Blake3(h) => {
                h.update(data);
            }
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Digestor::Md5(h) => h.finalize().to_vec(),
            Digestor::Sha1(h) => h.finalize().to_vec(),
            Digestor::Sha256(h) => h.finalize().to_vec(),
            Digestor::Sha384(h) => h.finalize().to_vec(),
            Digestor::Sha512(h) => h.finalize().to_vec(),
            Digestor::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}

/// Validate an algorithm tag against the registry.
pub fn require_algorithm(name: &str) -> Result<Algorithm, IntegrityError> {
    Algorithm::from_name(name).ok_or_else(|| IntegrityError::UnsupportedAlgorithm(name.to_string()))
}

/// Validate an encoding name against the fixed set.
pub fn require_encoding(name: &str) -> Result<Encoding, IntegrityError> {
    Encoding::from_name(name).ok_or_else(|| IntegrityError::UnsupportedEncoding(name.to_string()))
}
