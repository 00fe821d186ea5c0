//! Shared helpers for the duffel CLI.

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory.
///
/// Prefers the HOME environment variable over dirs::home_dir() so
/// container setups that remap HOME behave the same as shell scripts.
pub fn home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))
}

/// Name of the invoking user, used in the archive filename.
pub fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_dir_resolves() {
        if std::env::var("HOME").is_ok() {
            let home = home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    fn test_username_is_never_empty() {
        assert!(!current_username().is_empty());
    }
}
