//! Backup command

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use duffel_core::{
    human_bytes, BackupConfig, BackupOrchestrator, BackupReport, CancelFlag, CompressionMode,
    Error, Outcome, RuleSet, Traverser,
};

use crate::output;
use crate::prompt::CliSelector;
use crate::rulefile;
use crate::utils;
use crate::volumes;

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Source directory (default: home directory)
    #[arg(short, long)]
    pub source: Option<Utf8PathBuf>,

    /// Extension allow-list file
    #[arg(long, default_value = "file_extensions.txt")]
    pub extensions: Utf8PathBuf,

    /// Exclusion pattern file
    #[arg(long, default_value = "blacklist.txt")]
    pub blacklist: Utf8PathBuf,

    /// Destination mount path (skips the volume menu)
    #[arg(short, long)]
    pub destination: Option<Utf8PathBuf>,

    /// Compression mode (skips the compression menu)
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Stop after the size estimate
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// No compression (fastest)
    Store,

    /// Standard deflate (balanced)
    Deflate,

    /// Best ratio (slowest)
    Maximum,
}

impl Mode {
    /// Convert the CLI mode enum to the library mode type.
    fn to_lib_mode(self) -> CompressionMode {
        match self {
            Mode::Store => CompressionMode::Store,
            Mode::Deflate => CompressionMode::Deflate,
            Mode::Maximum => CompressionMode::Maximum,
        }
    }
}

pub async fn run(args: BackupArgs) -> Result<()> {
    output::header("Duffel Backup");

    let source_root: PathBuf = match &args.source {
        Some(path) => path.clone().into_std_path_buf(),
        None => utils::home_dir()?,
    };
    let username = utils::current_username();

    // Load rules
    let extensions = rulefile::load_extensions(args.extensions.as_std_path())?;
    let exclusions = rulefile::load_blacklist(args.blacklist.as_std_path());
    let rules = RuleSet::new(extensions, exclusions)?;

    output::kv("Source", &source_root.display().to_string());
    output::kv("User", &username);
    output::kv("Extensions", &rules.extension_count().to_string());
    output::kv("Exclusions", &rules.exclusion_count().to_string());
    if args.dry_run {
        output::warning("DRY RUN MODE - no archive will be created");
    }
    println!();

    // Wire Ctrl-C to cooperative cancellation
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    // Pre-flight estimate
    let spinner = output::spinner("Scanning source tree...");
    let traverser = Traverser::new(rules.clone());
    let scan = match traverser.walk(&source_root, &cancel) {
        Ok(scan) => scan,
        Err(Error::Cancelled) => {
            spinner.finish_and_clear();
            output::warning("Backup cancelled");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let mut candidates = scan.candidates;
    let estimated = match duffel_core::total_size(&mut candidates, &cancel) {
        Ok(total) => total,
        Err(Error::Cancelled) => {
            spinner.finish_and_clear();
            output::warning("Backup cancelled");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    spinner.finish_and_clear();

    // Rough gzip guess for mixed content
    let estimated_compressed = (estimated as f64 * 0.6) as u64;

    output::info("Backup estimate:");
    println!(
        "  Files:              {}",
        console::style(format_number(candidates.len() as u64)).cyan()
    );
    println!(
        "  Size:               {}",
        console::style(human_bytes(estimated)).cyan()
    );
    println!(
        "  Estimated archive:  {}",
        console::style(human_bytes(estimated_compressed)).cyan()
    );
    if !scan.denied.is_empty() {
        output::warning(&format!(
            "{} directories could not be read and were skipped",
            scan.denied.len()
        ));
    }
    println!();

    if args.dry_run {
        output::success("Dry run complete");
        return Ok(());
    }

    // Destination volumes
    let volumes = match &args.destination {
        Some(mount) => vec![volumes::snapshot(mount.as_std_path())?],
        None => volumes::enumerate()?,
    };
    if volumes.is_empty() {
        output::error("No destination volumes found");
        output::info("Connect an external volume, or pass --destination <mount>");
        anyhow::bail!("no destination volumes available");
    }

    // Presets skip their menus; --destination pins the only entry
    let volume_preset = args.destination.as_ref().map(|_| 0);
    let mode_preset = args
        .mode
        .map(|m| mode_index(m.to_lib_mode()));
    let selector = CliSelector::new(volume_preset, mode_preset, args.yes);

    let config = BackupConfig {
        username,
        source_root,
        rules,
        show_progress: !args.no_progress && !args.json,
    };

    let mut orchestrator = BackupOrchestrator::new(config);
    match orchestrator.run(&volumes, &selector, &cancel).await {
        Ok(report) => {
            print_report(&report);
            if args.json {
                println!("{}", report.summary.to_json()?);
            }
            Ok(())
        }
        Err(Error::Cancelled) => {
            println!();
            output::warning("Backup cancelled");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_report(report: &BackupReport) {
    let summary = &report.summary;

    println!();
    match report.outcome {
        Outcome::Completed => output::success("Backup completed successfully"),
        Outcome::PartiallyCompleted => {
            output::warning("Backup completed with skipped files")
        }
        Outcome::Cancelled => {
            output::warning("Backup cancelled; the partial archive is still readable")
        }
    }
    println!();

    output::kv("Archive", &summary.archive_path.display().to_string());
    output::kv("Destination", &summary.destination.display().to_string());
    output::kv("Compression", &summary.mode.to_string());
    output::kv(
        "Files written",
        &format_number(summary.written_count as u64),
    );
    if summary.skipped_count > 0 {
        output::kv("Files skipped", &format_number(summary.skipped_count as u64));
        for failure in summary.failures.iter().take(10) {
            println!(
                "    {} ({})",
                console::style(failure.path.display()).dim(),
                failure.reason
            );
        }
        if summary.failures.len() > 10 {
            println!(
                "    {}",
                console::style(format!("...and {} more", summary.failures.len() - 10)).dim()
            );
        }
    }
    output::kv("Archive size", &human_bytes(summary.archive_bytes));
    if summary.estimated_bytes > 0 {
        output::kv(
            "Space saved",
            &format!("{}%", summary.compression_percentage()),
        );
    }
    if let Some(checksum) = &summary.checksum_sha256 {
        output::kv("SHA256", checksum);
    }
    output::kv("Duration", &format!("{:.1}s", summary.duration_seconds));
}

fn mode_index(mode: CompressionMode) -> usize {
    CompressionMode::all()
        .iter()
        .position(|m| *m == mode)
        .unwrap_or(0)
}

fn format_number(n: u64) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_mode_index_matches_menu_order() {
        assert_eq!(mode_index(CompressionMode::Store), 0);
        assert_eq!(mode_index(CompressionMode::Deflate), 1);
        assert_eq!(mode_index(CompressionMode::Maximum), 2);
    }
}
