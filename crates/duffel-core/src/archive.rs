//! Archive creation for backups.
//!
//! Streams candidate files into a single tar container, optionally
//! gzip-compressed, preserving paths relative to the source root.
//! Individual files that fail to read are skipped and recorded; only a
//! failure of the archive stream itself aborts the run.

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tar::Builder as TarBuilder;

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::progress::BackupProgress;
use crate::traverse::CandidateFile;

/// Compression strategy applied to the archive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionMode {
    /// No compression, plain tar (fastest)
    Store,

    /// Standard deflate via gzip (balanced)
    Deflate,

    /// Best deflate ratio (slowest, most compact)
    Maximum,
}

impl CompressionMode {
    /// Returns all selectable modes in menu order.
    pub fn all() -> Vec<CompressionMode> {
        vec![
            CompressionMode::Store,
            CompressionMode::Deflate,
            CompressionMode::Maximum,
        ]
    }

    /// File extension of the archive this mode produces.
    pub fn archive_extension(&self) -> &'static str {
        match self {
            CompressionMode::Store => "tar",
            CompressionMode::Deflate | CompressionMode::Maximum => "tar.gz",
        }
    }

    /// Menu description of this mode.
    pub fn description(&self) -> &'static str {
        match self {
            CompressionMode::Store => "Fast (no compression)",
            CompressionMode::Deflate => "Normal (balanced)",
            CompressionMode::Maximum => "Maximum (slow, most compact)",
        }
    }

    /// Parses a mode from a string.
    pub fn from_str(s: &str) -> Option<CompressionMode> {
        match s.to_lowercase().as_str() {
            "store" | "none" => Some(CompressionMode::Store),
            "deflate" | "standard" => Some(CompressionMode::Deflate),
            "maximum" | "max" => Some(CompressionMode::Maximum),
            _ => None,
        }
    }

    fn gzip_level(&self) -> Option<Compression> {
        match self {
            CompressionMode::Store => None,
            CompressionMode::Deflate => Some(Compression::new(6)),
            CompressionMode::Maximum => Some(Compression::best()),
        }
    }
}

impl Default for CompressionMode {
    fn default() -> Self {
        CompressionMode::Deflate
    }
}

impl fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMode::Store => write!(f, "store"),
            CompressionMode::Deflate => write!(f, "deflate"),
            CompressionMode::Maximum => write!(f, "maximum"),
        }
    }
}

/// Why a candidate was skipped during archiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The file vanished between discovery and archiving
    NotFound,

    /// Read permission was revoked after discovery
    PermissionDenied,

    /// Any other per-file read failure
    Unreadable,
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SkipReason::NotFound,
            io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            _ => SkipReason::Unreadable,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not found"),
            SkipReason::PermissionDenied => write!(f, "permission denied"),
            SkipReason::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// One skipped candidate and why.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFailure {
    /// The candidate that could not be archived
    pub path: PathBuf,

    /// Why it was skipped
    pub reason: SkipReason,
}

/// Result of archive construction.
#[derive(Debug, Clone)]
pub struct ArchiveOutcome {
    /// Entries written into the container
    pub written_count: usize,

    /// Candidates skipped because of per-file failures
    pub failures: Vec<EntryFailure>,

    /// Whether cancellation stopped the run before all candidates
    /// were attempted. The container is still finalized and readable.
    pub cancelled: bool,

    /// Size of the finished archive in bytes
    pub archive_bytes: u64,
}

impl ArchiveOutcome {
    /// Number of candidates skipped.
    pub fn skipped_count(&self) -> usize {
        self.failures.len()
    }
}

/// Streams candidates into a single archive container.
pub struct ArchiveBuilder {
    mode: CompressionMode,
}

impl ArchiveBuilder {
    /// Creates a builder for the given compression mode.
    pub fn new(mode: CompressionMode) -> Self {
        Self { mode }
    }

    /// Writes `candidates` into an archive at `output_path`.
    ///
    /// Each entry is stored under its path relative to `root`, with
    /// forward-slash separators. A candidate that cannot be opened is
    /// recorded in the outcome and processing continues; an error on
    /// the archive stream itself is fatal. Cancellation between
    /// entries finalizes the container and returns with
    /// `cancelled = true`.
    pub fn build(
        &self,
        candidates: &[CandidateFile],
        root: &Path,
        output_path: &Path,
        cancel: &CancelFlag,
        progress: &mut Option<BackupProgress>,
    ) -> Result<ArchiveOutcome> {
        let writer = ArchiveWriter::create(output_path, self.mode)
            .map_err(|e| Error::archive_io(output_path, e))?;
        let mut tar = TarBuilder::new(writer);

        if let Some(p) = progress.as_mut() {
            p.start_archive(candidates.len() as u64, "Writing archive...");
        }

        let mut written_count = 0usize;
        let mut failures = Vec::new();
        let mut cancelled = false;

        for candidate in candidates {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(relative) = relative_entry_path(&candidate.path, root) else {
                tracing::warn!(
                    "candidate {} is outside the source root, skipping",
                    candidate.path.display()
                );
                failures.push(EntryFailure {
                    path: candidate.path.clone(),
                    reason: SkipReason::Unreadable,
                });
                continue;
            };

            let (mut file, metadata) = match open_candidate(&candidate.path) {
                Ok(opened) => opened,
                Err(err) => {
                    let reason = SkipReason::from_io(&err);
                    tracing::warn!(
                        "skipping {} ({reason}): {err}",
                        candidate.path.display()
                    );
                    failures.push(EntryFailure {
                        path: candidate.path.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let mut header = tar::Header::new_gnu();
            header.set_metadata(&metadata);
            tar.append_data(&mut header, &relative, &mut file)
                .map_err(|e| Error::archive_io(output_path, e))?;

            written_count += 1;
            if let Some(p) = progress.as_ref() {
                p.inc_archive();
            }
        }

        let writer = tar
            .into_inner()
            .map_err(|e| Error::archive_io(output_path, e))?;
        writer
            .finish()
            .map_err(|e| Error::archive_io(output_path, e))?;

        if let Some(p) = progress.as_ref() {
            p.finish_archive(&format!("Wrote {written_count} entries"));
        }

        let archive_bytes = std::fs::metadata(output_path)?.len();

        Ok(ArchiveOutcome {
            written_count,
            failures,
            cancelled,
            archive_bytes,
        })
    }
}

fn open_candidate(path: &Path) -> io::Result<(File, std::fs::Metadata)> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    Ok((file, metadata))
}

/// Path of `candidate` relative to `root`, joined with forward slashes
/// so containers are portable regardless of the host separator.
fn relative_entry_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Calculates the SHA256 checksum of a file.
pub fn calculate_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

enum ArchiveWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl ArchiveWriter {
    fn create(path: &Path, mode: CompressionMode) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match mode.gzip_level() {
            None => ArchiveWriter::Plain(file),
            Some(level) => ArchiveWriter::Gzip(GzEncoder::new(file, level)),
        })
    }

    fn finish(self) -> io::Result<()> {
        match self {
            ArchiveWriter::Plain(mut writer) => writer.flush(),
            ArchiveWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for ArchiveWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ArchiveWriter::Plain(writer) => writer.write(buf),
            ArchiveWriter::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ArchiveWriter::Plain(writer) => writer.flush(),
            ArchiveWriter::Gzip(encoder) => encoder.flush(),
        }
    }
}
