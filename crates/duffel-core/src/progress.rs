//! Progress reporting for backup operations.
//!
//! Visual feedback for the two long-running phases: scanning the
//! source tree and writing the archive.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Progress reporter for one backup run.
#[derive(Debug, Clone)]
pub struct BackupProgress {
    multi: Arc<MultiProgress>,
    scan_bar: Option<ProgressBar>,
    archive_bar: Option<ProgressBar>,
}

impl BackupProgress {
    /// Creates a new progress reporter with no active bars.
    pub fn new() -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            scan_bar: None,
            archive_bar: None,
        }
    }

    /// Starts the scanning-phase spinner.
    pub fn start_scan(&mut self, message: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        self.scan_bar = Some(bar);
    }

    /// Finishes the scanning phase.
    pub fn finish_scan(&self, message: &str) {
        if let Some(bar) = &self.scan_bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Starts the archive-writing bar with a known entry count.
    pub fn start_archive(&mut self, total_files: u64, message: &str) {
        let bar = self.multi.add(ProgressBar::new(total_files));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        self.archive_bar = Some(bar);
    }

    /// Increments the archive progress by one file.
    pub fn inc_archive(&self) {
        if let Some(bar) = &self.archive_bar {
            bar.inc(1);
        }
    }

    /// Finishes the archive phase.
    pub fn finish_archive(&self, message: &str) {
        if let Some(bar) = &self.archive_bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Finishes and clears all bars.
    pub fn finish_all(&self) {
        if let Some(bar) = &self.scan_bar {
            bar.finish_and_clear();
        }
        if let Some(bar) = &self.archive_bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for BackupProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_creation() {
        let progress = BackupProgress::new();
        assert!(progress.scan_bar.is_none());
        assert!(progress.archive_bar.is_none());
    }

    #[test]
    fn test_progress_lifecycle() {
        let mut progress = BackupProgress::new();

        progress.start_scan("Scanning files...");
        assert!(progress.scan_bar.is_some());
        progress.finish_scan("Scan complete");

        progress.start_archive(10, "Writing archive...");
        assert!(progress.archive_bar.is_some());
        progress.inc_archive();
        progress.finish_archive("Archive complete");

        progress.finish_all();
    }
}
