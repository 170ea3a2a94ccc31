//! Seed command: create a master table from a datasets directory

use super::shared::setup_logging;
use crate::cli::args::SeedArgs;
use crate::config::ExtractionConfig;
use crate::master_table::MasterTable;
use anyhow::{Context, Result, bail};
use colored::*;
use tracing::info;

pub fn run_seed(args: SeedArgs) -> Result<MasterTable> {
    setup_logging(&args.logging)?;

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to replace it",
            args.output.display()
        );
    }

    let config = ExtractionConfig::default();
    let table = MasterTable::seed(&args.datasets, config.dataset_separator_byte()?)
        .with_context(|| format!("Failed to scan {}", args.datasets.display()))?;
    table
        .write(&args.output, config.master_separator_byte()?)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Seeded {} rows into {}", table.len(), args.output.display());
    if !args.logging.quiet {
        println!(
            "{} {} rows from {} datasets into {}",
            "Seeded".bright_green(),
            table.len().to_string().bright_white().bold(),
            table.datasets().len().to_string().bright_white().bold(),
            args.output.display()
        );
    }
    Ok(table)
}
