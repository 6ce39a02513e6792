//! Integration tests for the create/check facade and candidate payloads

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use treeseal::options::IntegrityOptions;
use treeseal::{check, check_object, create, IntegrityError, IntegrityObject};

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

/// `check(path, create(path))` holds for files, directories and missing
/// paths.
#[test]
fn test_create_then_check_self_consistency() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let object = create(&root, &options).unwrap();
    assert!(check_object(&root, &object, &options).unwrap());

    let file = root.join("fileToHash.txt");
    let object = create(&file, &options).unwrap();
    assert!(check_object(&file, &object, &options).unwrap());

    let missing = temp_dir.path().join("missing");
    let object = create(&missing, &options).unwrap();
    assert!(check_object(&missing, &object, &options).unwrap());
}

#[test]
fn test_create_missing_path_yields_empty_object() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("not-here");

    let object = create(&missing, &IntegrityOptions::default()).unwrap();
    assert_eq!(object, IntegrityObject::empty());
    assert_eq!(object.version, "1");
}

#[test]
fn test_check_detects_content_change() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let object = create(&root, &options).unwrap();
    fs::write(root.join("fileToHash.txt"), "Hello Moon!").unwrap();
    assert!(!check_object(&root, &object, &options).unwrap());
}

/// The candidate may be a bare hash string; it is keyed by the target's
/// basename.
#[test]
fn test_check_bare_hash_payload() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let file = root.join("fileToHash.txt");

    assert!(check(&file, "sha1-14am1GFbKSyoE+RHp4u5gIxHawg=", &IntegrityOptions::default()).unwrap());
    assert!(!check(&file, "sha1-bm90IHRoZSByaWdodCBoYXNo", &IntegrityOptions::default()).unwrap());
}

/// The candidate may be a serialized object.
#[test]
fn test_check_json_payload() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let payload = create(&root, &options).unwrap().to_json();
    assert!(check(&root, &payload, &options).unwrap());
}

/// The candidate may be a manifest file path, or a directory containing one.
#[test]
fn test_check_manifest_path_payloads() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let object = create(&root, &options).unwrap();
    object.save(&root).unwrap();

    let manifest = root.join(treeseal::MANIFEST_FILENAME);
    let manifest_payload = manifest.to_string_lossy().into_owned();
    assert!(check(&root, &manifest_payload, &options).unwrap());

    let dir_payload = root.to_string_lossy().into_owned();
    assert!(check(&root, &dir_payload, &options).unwrap());
}

/// Empty payloads and directories without manifests degrade to false.
#[test]
fn test_unresolvable_payloads_degrade_to_false() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    assert!(!check(&root, "", &options).unwrap());

    let bare_dir = temp_dir.path().join("no-manifest");
    fs::create_dir(&bare_dir).unwrap();
    let payload = bare_dir.to_string_lossy().into_owned();
    assert!(!check(&root, &payload, &options).unwrap());
}

/// A located payload that fails schema validation raises.
#[test]
fn test_invalid_manifest_raises() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let manifest = root.join(treeseal::MANIFEST_FILENAME);
    fs::write(&manifest, r#"{"version":"1","hashes":{"f":42}}"#).unwrap();
    let payload = manifest.to_string_lossy().into_owned();
    assert!(matches!(
        check(&root, &payload, &options),
        Err(IntegrityError::SchemaValidationFailed(_))
    ));

    assert!(matches!(
        check(&root, r#"{"version":"3","hashes":{}}"#, &options),
        Err(IntegrityError::InvalidManifestVersion(_))
    ));
}

/// A candidate object with a different version raises even when the hashes
/// would match.
#[test]
fn test_version_mismatch_raises() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let mut object = create(&root, &options).unwrap();
    object.version = "0".to_string();
    assert!(matches!(
        check_object(&root, &object, &options),
        Err(IntegrityError::IncompatibleVersion { .. })
    ));
}

/// Verification is pure: neither side is mutated by a check.
#[test]
fn test_check_does_not_mutate_candidate() {
    let temp_dir = TempDir::new().unwrap();
    let root = fixtures(&temp_dir);
    let options = IntegrityOptions::default();

    let object = create(&root, &options).unwrap();
    let snapshot = object.clone();
    check_object(&root, &object, &options).unwrap();
    assert_eq!(object, snapshot);
}
