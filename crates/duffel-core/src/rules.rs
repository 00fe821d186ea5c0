//! Inclusion and exclusion rules for the backup traversal.
//!
//! Files are selected by their extension against an allow-list;
//! files and directories are rejected by basename against an
//! exclusion pattern set. Patterns come in three forms: literal
//! names, prefixes (single trailing `*`), and shell globs (any
//! embedded `*`). Matching is case-insensitive throughout.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

use crate::error::{Error, Result};

/// Parses a newline-delimited rule list.
///
/// `#`-prefixed comment lines and blank lines are ignored; entries are
/// trimmed and lowercased.
pub fn parse_rule_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// The inclusion/exclusion rule set applied during traversal.
///
/// Exclusion queries check pattern forms in a fixed order, first match
/// wins: literal equality, then prefix patterns, then globs.
#[derive(Debug, Clone)]
pub struct RuleSet {
    extensions: HashSet<String>,
    literals: HashSet<String>,
    prefixes: Vec<String>,
    globs: GlobSet,
    exclusion_count: usize,
}

impl RuleSet {
    /// Builds a rule set from extension and exclusion lists.
    ///
    /// Entries are lowercased; extensions are expected to carry their
    /// leading dot (`.jpg`). Glob patterns that fail to compile reject
    /// the whole rule set.
    pub fn new(extensions: Vec<String>, exclusions: Vec<String>) -> Result<Self> {
        let extensions: HashSet<String> =
            extensions.into_iter().map(|e| e.to_lowercase()).collect();

        let exclusion_count = exclusions.len();
        let mut literals = HashSet::new();
        let mut prefixes = Vec::new();
        let mut globs = GlobSetBuilder::new();

        for raw in exclusions {
            let pattern = raw.to_lowercase();
            match pattern.find('*') {
                None => {
                    literals.insert(pattern);
                }
                Some(index) if index == pattern.len() - 1 => {
                    prefixes.push(pattern[..index].to_string());
                }
                Some(_) => {
                    let glob = GlobBuilder::new(&pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| Error::invalid_pattern(&pattern, e))?;
                    globs.add(glob);
                }
            }
        }

        let globs = globs
            .build()
            .map_err(|e| Error::invalid_pattern("<exclusion set>", e))?;

        Ok(Self {
            extensions,
            literals,
            prefixes,
            globs,
            exclusion_count,
        })
    }

    /// Number of inclusion extensions.
    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Number of exclusion patterns.
    pub fn exclusion_count(&self) -> usize {
        self.exclusion_count
    }

    /// Whether a file is eligible by extension.
    ///
    /// Only the path's final extension component is considered, so
    /// `archive.tar.gz` matches `.gz` but not `.tar`.
    pub fn is_included(&self, path: &Path) -> bool {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self.extensions.contains(&format!(".{}", ext.to_lowercase())),
            None => false,
        }
    }

    /// Whether a basename (file or directory) is excluded.
    pub fn is_excluded(&self, basename: &str) -> bool {
        let name = basename.to_lowercase();
        if self.literals.contains(&name) {
            return true;
        }
        if self.prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return true;
        }
        self.globs.is_match(&name)
    }
}
