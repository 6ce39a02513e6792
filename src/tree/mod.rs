//! Filesystem tree hashing.
//!
//! Deterministic, name-sorted traversal feeding file digests and directory
//! rollups. The hashed root is threaded explicitly through every recursive
//! call; nothing here holds traversal state.

pub mod hasher;
pub mod path;
pub mod walker;
