//! Error types for duffel-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using duffel-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a backup run.
///
/// Per-file problems during traversal, sizing and archiving are never
/// represented here; they are collected into the run summary and the
/// run keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// No inclusion extensions were supplied
    #[error("no inclusion extensions loaded; refusing to run with an empty extension list")]
    EmptyExtensionList,

    /// An exclusion pattern failed to compile
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    /// Traversal found nothing to back up
    #[error("no files matched the inclusion rules under {}", .root.display())]
    NoCandidates { root: PathBuf },

    /// No destination volumes to choose from
    #[error("no destination volumes available")]
    NoVolumes,

    /// A selector answered with an index outside the offered options
    #[error("selection out of range: {index} of {count} options")]
    InvalidSelection { index: usize, count: usize },

    /// The chosen volume cannot hold the backup
    #[error(
        "insufficient space on {}: {required} bytes required, {available} bytes available",
        .mount.display()
    )]
    InsufficientCapacity {
        mount: PathBuf,
        required: u64,
        available: u64,
    },

    /// The archive stream itself became unwritable
    #[error("archive write failed at {}: {source}", .path.display())]
    ArchiveIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The run was cancelled by the user
    #[error("operation cancelled")]
    Cancelled,

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a no candidates error
    pub fn no_candidates(root: impl Into<PathBuf>) -> Self {
        Self::NoCandidates { root: root.into() }
    }

    /// Create an invalid selection error
    pub fn invalid_selection(index: usize, count: usize) -> Self {
        Self::InvalidSelection { index, count }
    }

    /// Create an insufficient capacity error
    pub fn insufficient_capacity(
        mount: impl Into<PathBuf>,
        required: u64,
        available: u64,
    ) -> Self {
        Self::InsufficientCapacity {
            mount: mount.into(),
            required,
            available,
        }
    }

    /// Create an archive IO error
    pub fn archive_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArchiveIo {
            path: path.into(),
            source,
        }
    }
}
