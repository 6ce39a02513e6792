//! Integration tests for single-file hashing

use std::fs;
use tempfile::TempDir;
use treeseal::options::{normalize, IntegrityOptions};
use treeseal::tree::hasher::hash_file;
use treeseal::IntegrityError;

fn options(file_algorithm: Option<&str>, encoding: Option<&str>) -> IntegrityOptions {
    IntegrityOptions {
        file_algorithm: file_algorithm.map(str::to_string),
        encoding: encoding.map(str::to_string),
        ..IntegrityOptions::default()
    }
}

/// Known fixture digest under the defaults (sha1, base64).
#[test]
fn test_known_sha1_base64_digest() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("fileToHash.txt");
    fs::write(&file, "Hello World!").unwrap();

    let normalized = normalize(&IntegrityOptions::default()).unwrap();
    assert_eq!(
        hash_file(&file, &normalized).unwrap(),
        "sha1-14am1GFbKSyoE+RHp4u5gIxHawg="
    );
}

#[test]
fn test_known_sha1_hex_digest() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("fileToHash.txt");
    fs::write(&file, "Hello World!").unwrap();

    let normalized = normalize(&options(None, Some("hex"))).unwrap();
    assert_eq!(
        hash_file(&file, &normalized).unwrap(),
        "sha1-d786a6d4615b292ca813e447a78bb9808c476b08"
    );
}

#[test]
fn test_known_md5_base64_digest() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("fileToHash.txt");
    fs::write(&file, "Hello World!").unwrap();

    let normalized = normalize(&options(Some("md5"), None)).unwrap();
    assert_eq!(
        hash_file(&file, &normalized).unwrap(),
        "md5-L2O2KbQpmkCV3Re4mTqLcw=="
    );
}

/// Renaming a file without changing its bytes changes the hash: the basename
/// seeds the digest.
#[test]
fn test_rename_changes_hash() {
    let temp_dir = TempDir::new().unwrap();
    let original = temp_dir.path().join("fileToHash.txt");
    fs::write(&original, "Hello World!").unwrap();

    let normalized = normalize(&IntegrityOptions::default()).unwrap();
    let before = hash_file(&original, &normalized).unwrap();

    let renamed = temp_dir.path().join("renamed.txt");
    fs::rename(&original, &renamed).unwrap();
    let after = hash_file(&renamed, &normalized).unwrap();

    assert_ne!(before, after);
    assert_eq!(after, "sha1-3iM5eU2LvKSMbSEPnwjD7Vb03yc=");
}

#[test]
fn test_content_change_changes_hash() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("fileToHash.txt");
    fs::write(&file, "Hello World!").unwrap();

    let normalized = normalize(&IntegrityOptions::default()).unwrap();
    let before = hash_file(&file, &normalized).unwrap();

    fs::write(&file, "Hello World?").unwrap();
    let after = hash_file(&file, &normalized).unwrap();

    assert_ne!(before, after);
}

#[test]
fn test_empty_file_still_hashes() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("empty.txt");
    fs::write(&file, "").unwrap();

    let normalized = normalize(&IntegrityOptions::default()).unwrap();
    let hash = hash_file(&file, &normalized).unwrap();
    assert!(hash.starts_with("sha1-"));
}

#[test]
fn test_missing_file_is_not_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.txt");

    let normalized = normalize(&IntegrityOptions::default()).unwrap();
    assert!(matches!(
        hash_file(&missing, &normalized),
        Err(IntegrityError::NotAFile(_))
    ));
}
