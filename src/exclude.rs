//! Exclusion matcher for tree hashing.
//!
//! Patterns use shell-glob semantics (`globset` with a literal separator, so
//! `*` stays within one path component and `**` crosses levels; dot-files are
//! matched by wildcards). A path is excluded when it matches any exclude
//! pattern and no include pattern; `!`-prefixed patterns form the include
//! list. Paths are matched relative to the hashed root, never the immediate
//! parent.

use crate::error::IntegrityError;
use crate::object::MANIFEST_FILENAME;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Exclusions appended to every filter: the integrity manifest itself and
/// common VCS directories, at the root and at any depth.
const DEFAULT_EXCLUSIONS: &[&str] = &[
    MANIFEST_FILENAME,
    "**/.integrity.json",
    ".git",
    "**/.git",
    ".svn",
    "**/.svn",
    ".hg",
    "**/.hg",
];

/// Compiled exclusion filter. Pattern normalization happens once, at
/// construction, not per path.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    exclude: GlobSet,
    include: GlobSet,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
}

impl ExclusionFilter {
    /// Build a filter from raw pattern lines.
    ///
    /// Normalization rules:
    /// 1. Blank lines and `#` comment lines are dropped.
    /// 2. Every pattern that is not directory-qualified gains a derived
    ///    `<pattern>/**` variant, so excluding a bare directory name also
    ///    excludes everything beneath it.
    /// 3. `!`-prefixed patterns move to the include list, prefix stripped.
    /// 4. The default exclusions are appended unconditionally.
    pub fn new(patterns: &[String]) -> Result<Self, IntegrityError> {
        let mut exclude_patterns = Vec::new();
        let mut include_patterns = Vec::new();

        let defaults = DEFAULT_EXCLUSIONS.iter().map(|p| (*p).to_string());
        for raw in patterns.iter().cloned().chain(defaults) {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (negated, pattern) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            if pattern.is_empty() {
                continue;
            }
            let target = if negated {
                &mut include_patterns
            } else {
                &mut exclude_patterns
            };
            target.push(pattern.to_string());
            if let Some(derived) = contents_pattern(pattern) {
                target.push(derived);
            }
        }

        let exclude = compile(&exclude_patterns)?;
        let include = compile(&include_patterns)?;

        Ok(Self {
            exclude,
            include,
            exclude_patterns,
            include_patterns,
        })
    }

    /// Filter with only the default exclusions.
    pub fn empty() -> Self {
        // The defaults are static and known-good; a build failure here is a bug.
        Self::new(&[]).expect("default exclusion patterns must compile")
    }

    /// Whether `relative_path` (relative to the hashed root) is excluded.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.exclude.is_match(relative_path) && !self.include.is_match(relative_path)
    }

    /// Normalized exclude patterns, after derivation and negation-splitting.
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Normalized include (negation override) patterns.
    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::empty()
    }
}

/// Derived pattern matching a directory's entire contents, or None when the
/// pattern is already directory-qualified.
fn contents_pattern(pattern: &str) -> Option<String> {
    if pattern.ends_with("/**") {
        return None;
    }
    if pattern.ends_with('/') {
        return Some(format!("{}**", pattern));
    }
    Some(format!("{}/**", pattern))
}

fn compile(patterns: &[String]) -> Result<GlobSet, IntegrityError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| IntegrityError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| IntegrityError::InvalidPattern(e.to_string()))
}
