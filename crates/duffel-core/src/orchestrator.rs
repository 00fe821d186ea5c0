//! Run sequencing: discovery, sizing, destination choice, capacity
//! check, archiving, outcome.
//!
//! The orchestrator advances through its states strictly forward
//! within one run; nothing loops back. Fatal preconditions abort with
//! an error, per-file problems end up in the summary, and cancellation
//! is a distinct terminal state.

use std::path::PathBuf;
use std::time::Instant;

use crate::archive::{calculate_checksum, ArchiveBuilder, CompressionMode};
use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::progress::BackupProgress;
use crate::report::{self, human_bytes, RunSummary};
use crate::rules::RuleSet;
use crate::select::Selector;
use crate::size;
use crate::traverse::{CandidateFile, Scan, Traverser};
use crate::volume::{ensure_fits, DestinationVolume};

/// Configuration for one backup run.
///
/// Everything ambient (user, home directory) is passed in explicitly
/// so the pipeline can run against synthetic inputs.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Name used in the archive filename
    pub username: String,

    /// Root of the tree to back up
    pub source_root: PathBuf,

    /// Inclusion and exclusion rules
    pub rules: RuleSet,

    /// Whether to draw progress bars
    pub show_progress: bool,
}

/// Pipeline stage, advanced strictly forward within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    Idle,
    Discovering,
    Sizing,
    AwaitingDestination,
    CapacityChecked,
    Archiving,
    Completed,
    PartiallyCompleted,
    Cancelled,
    Failed,
}

/// Terminal result of a run that produced an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every candidate was written
    Completed,

    /// Some candidates failed individually, the archive was still
    /// produced
    PartiallyCompleted,

    /// Cancellation stopped archiving; the partial archive is valid
    Cancelled,
}

/// The aggregate fixed once the capacity check passes.
#[derive(Debug, Clone)]
pub struct BackupJob {
    pub source_root: PathBuf,
    pub candidates: Vec<CandidateFile>,
    pub volume: DestinationVolume,
    pub mode: CompressionMode,
    pub output_path: PathBuf,
}

/// Report handed back to the caller.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub outcome: Outcome,
    pub summary: RunSummary,
}

/// Sequences the backup pipeline.
pub struct BackupOrchestrator {
    config: BackupConfig,
    state: BackupState,
}

impl BackupOrchestrator {
    /// Creates an orchestrator for one run.
    pub fn new(config: BackupConfig) -> Self {
        Self {
            config,
            state: BackupState::Idle,
        }
    }

    /// Current pipeline stage.
    pub fn state(&self) -> BackupState {
        self.state
    }

    /// Runs the pipeline end to end.
    ///
    /// Cancellation before archiving returns [`Error::Cancelled`] with
    /// nothing written; cancellation during archiving returns a report
    /// with [`Outcome::Cancelled`] and the partial archive finalized.
    pub async fn run(
        &mut self,
        volumes: &[DestinationVolume],
        selector: &dyn Selector,
        cancel: &CancelFlag,
    ) -> Result<BackupReport> {
        let start = Instant::now();

        if self.config.rules.extension_count() == 0 {
            return self.observe(Err(Error::EmptyExtensionList));
        }

        self.state = BackupState::Discovering;
        let mut progress = if self.config.show_progress {
            Some(BackupProgress::new())
        } else {
            None
        };
        if let Some(p) = progress.as_mut() {
            p.start_scan("Scanning source tree...");
        }

        let traverser = Traverser::new(self.config.rules.clone());
        let scan = self.observe(traverser.walk(&self.config.source_root, cancel))?;
        let Scan {
            mut candidates,
            denied,
        } = scan;

        if let Some(p) = progress.as_ref() {
            p.finish_scan(&format!("Found {} files to back up", candidates.len()));
        }

        if candidates.is_empty() {
            return self.observe(Err(Error::no_candidates(self.config.source_root.clone())));
        }

        self.state = BackupState::Sizing;
        let estimated = self.observe(size::total_size(&mut candidates, cancel))?;
        tracing::info!(
            "{} candidates, estimated {}",
            candidates.len(),
            human_bytes(estimated)
        );

        self.state = BackupState::AwaitingDestination;
        if volumes.is_empty() {
            return self.observe(Err(Error::NoVolumes));
        }
        let index = self.observe(selector.choose_volume(volumes))?;
        let volume = match volumes.get(index) {
            Some(volume) => volume.clone(),
            None => return self.observe(Err(Error::invalid_selection(index, volumes.len()))),
        };

        self.observe(ensure_fits(&volume, estimated))?;
        self.state = BackupState::CapacityChecked;

        let modes = CompressionMode::all();
        let mode_index = self.observe(selector.choose_mode(&modes))?;
        let mode = match modes.get(mode_index) {
            Some(mode) => *mode,
            None => return self.observe(Err(Error::invalid_selection(mode_index, modes.len()))),
        };

        let prompt = format!(
            "Back up {} files ({}) to {}?",
            candidates.len(),
            human_bytes(estimated),
            volume.mount.display()
        );
        if !self.observe(selector.confirm(&prompt))? {
            self.state = BackupState::Cancelled;
            return Err(Error::Cancelled);
        }

        let output_path = archive_path(&volume, &self.config.username, mode);
        let job = BackupJob {
            source_root: self.config.source_root.clone(),
            candidates,
            volume,
            mode,
            output_path,
        };

        self.state = BackupState::Archiving;
        tracing::info!("writing archive {}", job.output_path.display());

        let builder = ArchiveBuilder::new(job.mode);
        let archive = self.observe(builder.build(
            &job.candidates,
            &job.source_root,
            &job.output_path,
            cancel,
            &mut progress,
        ))?;

        if let Some(p) = progress.as_ref() {
            p.finish_all();
        }

        let checksum = calculate_checksum(&job.output_path).ok();
        let duration = start.elapsed().as_secs_f64();

        let outcome = if archive.cancelled {
            Outcome::Cancelled
        } else if archive.failures.is_empty() {
            Outcome::Completed
        } else {
            Outcome::PartiallyCompleted
        };
        self.state = match outcome {
            Outcome::Completed => BackupState::Completed,
            Outcome::PartiallyCompleted => BackupState::PartiallyCompleted,
            Outcome::Cancelled => BackupState::Cancelled,
        };

        let summary = RunSummary {
            candidate_count: job.candidates.len(),
            estimated_bytes: estimated,
            destination: job.volume.mount.clone(),
            mode: job.mode,
            archive_path: job.output_path.clone(),
            written_count: archive.written_count,
            skipped_count: archive.skipped_count(),
            failures: archive.failures,
            denied_dirs: denied,
            archive_bytes: archive.archive_bytes,
            compression_ratio: report::compression_ratio(estimated, archive.archive_bytes),
            checksum_sha256: checksum,
            duration_seconds: duration,
        };

        Ok(BackupReport { outcome, summary })
    }

    /// Folds a stage result into the state machine: cancellation moves
    /// to `Cancelled`, any other error to `Failed`.
    fn observe<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::Cancelled) => {
                self.state = BackupState::Cancelled;
                Err(Error::Cancelled)
            }
            Err(err) => {
                self.state = BackupState::Failed;
                Err(err)
            }
            ok => ok,
        }
    }
}

/// `<mount>/backup_<username>_<YYYYMMDD_HHMMSS>.<ext>`
fn archive_path(
    volume: &DestinationVolume,
    username: &str,
    mode: CompressionMode,
) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    volume.mount.join(format!(
        "backup_{}_{}.{}",
        username,
        timestamp,
        mode.archive_extension()
    ))
}
