//! Integration tests for crypto-option detection during checks

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use treeseal::options::IntegrityOptions;
use treeseal::{check_object, create, IntegrityError};

fn fixtures(temp_dir: &TempDir) -> PathBuf {
    let root = temp_dir.path().join("fixtures");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("fileToHash.txt"), "Hello World!").unwrap();
    fs::create_dir(root.join("directory.1")).unwrap();
    fs::write(
        root.join("directory.1").join("anotherFileToHash.txt"),
        "Another file",
    )
    .unwrap();
    root
}

/// A check without options recovers algorithms, encoding and verbosity from
/// the candidate's hash strings.
#[test]
fn test_check_detects_non_default_options() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);

    let options = IntegrityOptions {
        file_algorithm: Some("md5".to_string()),
        dir_algorithm: Some("sha256".to_string()),
        encoding: Some("hex".to_string()),
        verbose: Some(true),
        ..IntegrityOptions::default()
    };
    let object = create(&root, &options).unwrap();

    assert!(check_object(&root, &object, &IntegrityOptions::default()).unwrap());
}

#[test]
fn test_check_detects_blake3_rollup() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);

    let options = IntegrityOptions {
        file_algorithm: Some("blake3".to_string()),
        dir_algorithm: Some("blake3".to_string()),
        ..IntegrityOptions::default()
    };
    let object = create(&root, &options).unwrap();

    assert!(check_object(&root, &object, &IntegrityOptions::default()).unwrap());
}

/// Detection on a single-file object recovers the file algorithm from the
/// only hash present.
#[test]
fn test_check_detects_file_options() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let file = root.join("fileToHash.txt");

    let options = IntegrityOptions {
        file_algorithm: Some("sha384".to_string()),
        encoding: Some("latin1".to_string()),
        ..IntegrityOptions::default()
    };
    let object = create(&file, &options).unwrap();

    assert!(check_object(&file, &object, &IntegrityOptions::default()).unwrap());
}

/// Caller-specified options always win over detection; here they force a
/// mismatch against a candidate built with different options.
#[test]
fn test_caller_options_override_detection() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);

    let object = create(&root, &IntegrityOptions::default()).unwrap();

    let forced = IntegrityOptions {
        dir_algorithm: Some("sha256".to_string()),
        ..IntegrityOptions::default()
    };
    assert!(!check_object(&root, &object, &forced).unwrap());
}

/// Unsupported caller options fail during normalization, not detection.
#[test]
fn test_unsupported_options_raise() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let object = create(&root, &IntegrityOptions::default()).unwrap();

    let bad_algorithm = IntegrityOptions {
        dir_algorithm: Some("crc32".to_string()),
        ..IntegrityOptions::default()
    };
    assert!(matches!(
        check_object(&root, &object, &bad_algorithm),
        Err(IntegrityError::UnsupportedAlgorithm(_))
    ));

    let bad_encoding = IntegrityOptions {
        encoding: Some("base32".to_string()),
        ..IntegrityOptions::default()
    };
    assert!(matches!(
        check_object(&root, &object, &bad_encoding),
        Err(IntegrityError::UnsupportedEncoding(_))
    ));
}
