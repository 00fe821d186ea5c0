//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

// Re-export command types for convenience
pub use crate::commands::backup::BackupArgs;

/// Duffel - selective home-directory backup to external volumes
#[derive(Parser, Debug)]
#[command(name = "duffel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up eligible files onto an external volume
    Backup(BackupArgs),

    /// List detected destination volumes
    Volumes(VolumesArgs),
}

#[derive(Args, Debug)]
pub struct VolumesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
