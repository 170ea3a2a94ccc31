//! Command-line argument definitions
//!
//! The CLI is a clap derive parser with one subcommand per workflow:
//! extracting features into a master table, seeding a master table from a
//! datasets directory, and inspecting the features of a single file.

use crate::constants::{DEFAULT_DATASET_SEPARATOR, DEFAULT_DATASETS_ROOT, DEFAULT_MASTER_TABLE};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Column feature extraction for tabular datasets
///
/// Computes per-column statistical and structural descriptors and stores
/// them in a master feature table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "column_features",
    version,
    about = "Compute per-column feature vectors for tabular datasets",
    long_about = "Computes engineered per-column features (type, sign ratios, uniqueness, \
                  quartiles, coefficient of variation, positional and neighbour ratios) for \
                  delimited datasets and merges them into a master feature table used as \
                  classifier training data."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compute features for every dataset named in the master table
    Extract(ExtractArgs),
    /// Build a new master table from a datasets directory
    Seed(SeedArgs),
    /// Print the features of a single dataset file
    Features(FeaturesArgs),
}

/// Logging flags shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LoggingArgs {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the extract command
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Master feature table to update
    #[arg(
        short = 'm',
        long = "master",
        value_name = "PATH",
        default_value = DEFAULT_MASTER_TABLE
    )]
    pub master: PathBuf,

    /// Directory holding `<domain>/<file>` datasets
    ///
    /// Overrides the config file; defaults to `datasets`.
    #[arg(short = 'd', long = "datasets", value_name = "DIR")]
    pub datasets: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum number of dataset files processed at once
    #[arg(short = 'j', long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Write unit-normalized datasets back over the originals
    #[arg(long = "persist-normalized")]
    pub persist_normalized: bool,

    /// Where to write the updated table (defaults to overwriting the master)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ExtractArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.master.clone())
    }

    /// Progress bars only make sense for interactive text output
    pub fn show_progress(&self) -> bool {
        !self.logging.quiet && self.format == OutputFormat::Text
    }
}

/// Arguments for the seed command
#[derive(Debug, Clone, Parser)]
pub struct SeedArgs {
    /// Directory holding `<domain>/<file>` datasets
    #[arg(
        short = 'd',
        long = "datasets",
        value_name = "DIR",
        default_value = DEFAULT_DATASETS_ROOT
    )]
    pub datasets: PathBuf,

    /// Master table to create
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = DEFAULT_MASTER_TABLE
    )]
    pub output: PathBuf,

    /// Replace an existing master table
    #[arg(long = "force")]
    pub force: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the features command
#[derive(Debug, Clone, Parser)]
pub struct FeaturesArgs {
    /// Dataset file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field separator of the dataset
    #[arg(short = 's', long = "separator", default_value_t = DEFAULT_DATASET_SEPARATOR)]
    pub separator: char,

    /// Skip unit normalization before computing features
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Text,
    /// JSON format for scripting
    Json,
}
