//! Rule-file loading.
//!
//! Extension and blacklist files are newline-delimited lists:
//! `#`-prefixed lines and blank lines are ignored, entries are
//! lowercased. Extension entries must carry their leading dot;
//! anything else in the extension file is dropped.

use anyhow::{Context, Result};
use std::path::Path;

use duffel_core::parse_rule_lines;

use crate::output;

/// Loads the extension allow-list. A missing file is fatal.
pub fn load_extensions(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read extension list {}", path.display()))?;

    Ok(parse_rule_lines(&text)
        .into_iter()
        .filter(|entry| entry.starts_with('.'))
        .collect())
}

/// Loads the exclusion patterns. A missing file means no exclusions.
pub fn load_blacklist(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_rule_lines(&text),
        Err(_) => {
            output::warning(&format!(
                "{} not found, no exclusions applied",
                path.display()
            ));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_extensions_filters_and_lowercases() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file_extensions.txt");
        fs::write(
            &path,
            "# images\n.JPG\n.png\n\nnot-an-extension\n.PDF\n",
        )
        .unwrap();

        let extensions = load_extensions(&path).unwrap();
        assert_eq!(extensions, vec![".jpg", ".png", ".pdf"]);
    }

    #[test]
    fn test_load_extensions_missing_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = load_extensions(&temp.path().join("missing.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_blacklist_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let patterns = load_blacklist(&temp.path().join("missing.txt"));
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_blacklist_parses_patterns() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blacklist.txt");
        fs::write(&path, "# caches\nnode_modules\n*.log\nTemp*\n").unwrap();

        let patterns = load_blacklist(&path);
        assert_eq!(patterns, vec!["node_modules", "*.log", "temp*"]);
    }
}
