//! Treeseal: content-integrity fingerprints for files and directory trees.
//!
//! Computes versioned, serializable integrity objects over a file or a
//! directory tree and verifies a path against a previously produced object,
//! even when the checked path sits below the root the object was created
//! against.

pub mod api;
pub mod crypto;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod object;
pub mod options;
pub mod tree;
pub mod verify;

pub use api::{check, check_object, create};
pub use error::IntegrityError;
pub use object::{HashEntry, IntegrityObject, VerboseHashEntry, CURRENT_VERSION, MANIFEST_FILENAME};
pub use options::{DetectedOptions, IntegrityOptions, NormalizedOptions};
pub use tree::hasher::{hash_directory, hash_file, hash_files};
