//! Structured run summary and size formatting.

use serde::Serialize;
use std::path::PathBuf;

use crate::archive::{CompressionMode, EntryFailure};
use crate::error::Result;

/// Structured summary of a finished run, suitable for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Files selected by traversal
    pub candidate_count: usize,

    /// Estimated total size of the candidates in bytes
    pub estimated_bytes: u64,

    /// Mount point of the chosen destination
    pub destination: PathBuf,

    /// Compression mode applied to the archive
    pub mode: CompressionMode,

    /// Path of the produced archive
    pub archive_path: PathBuf,

    /// Entries actually written into the archive
    pub written_count: usize,

    /// Candidates skipped because of per-file failures
    pub skipped_count: usize,

    /// Per-file failures with reasons
    pub failures: Vec<EntryFailure>,

    /// Directories traversal could not read
    pub denied_dirs: Vec<PathBuf>,

    /// Final archive size in bytes
    pub archive_bytes: u64,

    /// Compressed / original ratio (0.0 when nothing was measured)
    pub compression_ratio: f64,

    /// SHA256 of the archive, when it could be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_sha256: Option<String>,

    /// Wall-clock duration of the run in seconds
    pub duration_seconds: f64,
}

impl RunSummary {
    /// Returns the space saved by compression as a percentage.
    pub fn compression_percentage(&self) -> u8 {
        ((1.0 - self.compression_ratio) * 100.0).clamp(0.0, 100.0) as u8
    }

    /// Serializes the summary to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Computes the compressed / original ratio.
pub(crate) fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original > 0 {
        compressed as f64 / original as f64
    } else {
        0.0
    }
}

/// Formats bytes as a human-readable string.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::SkipReason;

    fn sample_summary() -> RunSummary {
        RunSummary {
            candidate_count: 100,
            estimated_bytes: 10_000_000,
            destination: PathBuf::from("/media/usb"),
            mode: CompressionMode::Deflate,
            archive_path: PathBuf::from("/media/usb/backup_alice_20260101_120000.tar.gz"),
            written_count: 99,
            skipped_count: 1,
            failures: vec![EntryFailure {
                path: PathBuf::from("/home/alice/gone.jpg"),
                reason: SkipReason::NotFound,
            }],
            denied_dirs: vec![],
            archive_bytes: 5_000_000,
            compression_ratio: 0.5,
            checksum_sha256: Some("ab".repeat(32)),
            duration_seconds: 12.5,
        }
    }

    #[test]
    fn test_compression_percentage() {
        let mut summary = sample_summary();
        assert_eq!(summary.compression_percentage(), 50);

        summary.compression_ratio = 0.7;
        assert_eq!(summary.compression_percentage(), 30);

        summary.compression_ratio = 1.2;
        assert_eq!(summary.compression_percentage(), 0);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = sample_summary();
        let json = summary.to_json().unwrap();
        assert!(json.contains("written_count"));
        assert!(json.contains("not-found"));
        assert!(json.contains("deflate"));
    }

    #[test]
    fn test_compression_ratio_handles_zero_original() {
        assert_eq!(compression_ratio(0, 100), 0.0);
        assert_eq!(compression_ratio(1000, 500), 0.5);
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(1024), "1.00 KB");
        assert_eq!(human_bytes(1_048_576), "1.00 MB");
        assert_eq!(human_bytes(5_242_880), "5.00 MB");
        assert_eq!(human_bytes(1_073_741_824), "1.00 GB");
    }
}
