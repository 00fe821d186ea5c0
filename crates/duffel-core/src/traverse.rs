//! Candidate discovery over the source tree.
//!
//! The traverser walks the source root depth-first, prunes excluded
//! directories before descending into them, and yields files whose
//! extension matches the inclusion rules, in discovery order.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::rules::RuleSet;

/// A file selected by traversal as eligible for archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Absolute path of the file
    pub path: PathBuf,

    /// Size in bytes, filled in by the size accounting stage.
    /// Stays `None` when the file cannot be measured.
    pub size: Option<u64>,
}

impl CandidateFile {
    /// Creates a candidate with no size yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: None,
        }
    }
}

/// Everything one traversal produced.
#[derive(Debug, Default)]
pub struct Scan {
    /// Eligible files in discovery order
    pub candidates: Vec<CandidateFile>,

    /// Paths that could not be read (permission denied etc.)
    pub denied: Vec<PathBuf>,
}

/// Recursive descent with rule-based pruning.
pub struct Traverser {
    rules: RuleSet,
}

impl Traverser {
    /// Creates a traverser over the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Walks `root` and returns the candidates in discovery order.
    ///
    /// Subdirectories whose basename matches an exclusion pattern are
    /// pruned before descent; their contents are never visited.
    /// Unreadable directories are recorded in [`Scan::denied`] and
    /// skipped rather than aborting the walk. Symlinks are not
    /// followed.
    pub fn walk(&self, root: &Path, cancel: &CancelFlag) -> Result<Scan> {
        let mut scan = Scan::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.excluded_basename(entry.path()));

        for entry in walker {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    tracing::warn!("skipping unreadable path {}: {}", path.display(), err);
                    scan.denied.push(path);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.rules.is_included(entry.path()) {
                scan.candidates.push(CandidateFile::new(entry.path()));
            }
        }

        Ok(scan)
    }

    fn excluded_basename(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.rules.is_excluded(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn rules(extensions: &[&str], exclusions: &[&str]) -> RuleSet {
        RuleSet::new(
            extensions.iter().map(|s| s.to_string()).collect(),
            exclusions.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        fs::create_dir_all(base.join("photos/2024")).unwrap();
        fs::create_dir_all(base.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(base.join("temp_build")).unwrap();
        fs::write(base.join("photos/cat.jpg"), "cat").unwrap();
        fs::write(base.join("photos/2024/dog.JPG"), "dog").unwrap();
        fs::write(base.join("photos/notes.txt"), "notes").unwrap();
        fs::write(base.join("node_modules/pkg/bundled.jpg"), "bundled").unwrap();
        fs::write(base.join("temp_build/render.jpg"), "render").unwrap();
        fs::write(base.join("secret_scan.jpg"), "secret").unwrap();
        fs::write(base.join("report.pdf"), "report").unwrap();

        temp
    }

    fn candidate_names(scan: &Scan, root: &Path) -> HashSet<String> {
        scan.candidates
            .iter()
            .map(|c| {
                c.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_walk_selects_by_extension() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg", ".pdf"], &[]));
        let scan = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();

        let names = candidate_names(&scan, temp.path());
        assert!(names.contains("photos/cat.jpg"));
        assert!(names.contains("photos/2024/dog.JPG"));
        assert!(names.contains("report.pdf"));
        assert!(!names.contains("photos/notes.txt"));
    }

    #[test]
    fn test_excluded_directory_subtree_is_never_visited() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg"], &["node_modules", "temp*"]));
        let scan = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();

        let names = candidate_names(&scan, temp.path());
        assert!(!names.iter().any(|n| n.starts_with("node_modules")));
        assert!(!names.iter().any(|n| n.starts_with("temp_build")));
        assert!(names.contains("photos/cat.jpg"));
    }

    #[test]
    fn test_excluded_file_basename_is_skipped() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg"], &["secret*"]));
        let scan = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();

        let names = candidate_names(&scan, temp.path());
        assert!(!names.contains("secret_scan.jpg"));
        assert!(names.contains("photos/cat.jpg"));
    }

    #[test]
    fn test_walk_is_idempotent() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg", ".pdf"], &["node_modules"]));

        let first = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();
        let second = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();

        assert_eq!(
            candidate_names(&first, temp.path()),
            candidate_names(&second, temp.path())
        );
    }

    #[test]
    fn test_candidates_stay_within_root() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg"], &[]));
        let scan = traverser.walk(temp.path(), &CancelFlag::new()).unwrap();

        assert!(!scan.candidates.is_empty());
        for candidate in &scan.candidates {
            assert!(candidate.path.starts_with(temp.path()));
        }
    }

    #[test]
    fn test_cancelled_walk_stops() {
        let temp = create_test_tree();
        let traverser = Traverser::new(rules(&[".jpg"], &[]));
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = traverser.walk(temp.path(), &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
