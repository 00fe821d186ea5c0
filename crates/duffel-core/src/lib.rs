//! Duffel backup pipeline
//!
//! This crate implements the file-selection and archive-construction
//! pipeline behind the `duffel` CLI: rule-based traversal of a home
//! directory tree, best-effort size accounting, capacity validation
//! against a destination volume, and streaming tar archive assembly
//! with per-file failure tolerance.
//!
//! The stages hand each other plain values (a candidate list, then a
//! [`BackupJob`]) and are driven by [`BackupOrchestrator`]; interactive
//! decisions go through the [`Selector`] trait so automation and tests
//! can answer programmatically.
//!
//! # Example
//!
//! ```no_run
//! use duffel_core::{
//!     BackupConfig, BackupOrchestrator, CancelFlag, DestinationVolume, PresetSelector, RuleSet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> duffel_core::Result<()> {
//!     let rules = RuleSet::new(
//!         vec![".jpg".into(), ".pdf".into()],
//!         vec!["node_modules".into(), "*.log".into()],
//!     )?;
//!
//!     let config = BackupConfig {
//!         username: "alice".into(),
//!         source_root: "/home/alice".into(),
//!         rules,
//!         show_progress: false,
//!     };
//!
//!     let volumes = vec![DestinationVolume::new(
//!         "/media/alice/usb",
//!         64_000_000_000,
//!         64_000_000_000,
//!     )];
//!     let selector = PresetSelector::new(0, 1, true);
//!
//!     let mut orchestrator = BackupOrchestrator::new(config);
//!     let report = orchestrator
//!         .run(&volumes, &selector, &CancelFlag::new())
//!         .await?;
//!     println!("wrote {} files", report.summary.written_count);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cancel;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod rules;
pub mod select;
pub mod size;
pub mod traverse;
pub mod volume;

// Re-export commonly used types
pub use archive::{
    calculate_checksum, ArchiveBuilder, ArchiveOutcome, CompressionMode, EntryFailure, SkipReason,
};
pub use cancel::CancelFlag;
pub use error::{Error, Result};
pub use orchestrator::{
    BackupConfig, BackupJob, BackupOrchestrator, BackupReport, BackupState, Outcome,
};
pub use progress::BackupProgress;
pub use report::{human_bytes, RunSummary};
pub use rules::{parse_rule_lines, RuleSet};
pub use select::{PresetSelector, Selector};
pub use size::total_size;
pub use traverse::{CandidateFile, Scan, Traverser};
pub use volume::{ensure_fits, DestinationVolume};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(CompressionMode::default(), CompressionMode::Deflate);
    }
}
