//! Extract command: fill the master table's feature cells

use super::shared::{report_stats, setup_logging};
use crate::cli::args::ExtractArgs;
use crate::config::{ConfigOverrides, ExtractionConfig};
use crate::models::ProcessingStats;
use crate::processor::FeatureExtractor;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Load configuration, run extraction over the master table and write it
pub async fn run_extract(args: ExtractArgs) -> Result<ProcessingStats> {
    setup_logging(&args.logging)?;
    info!("Starting feature extraction");
    debug!("Command line arguments: {:?}", args);

    let overrides = ConfigOverrides {
        datasets_root: args.datasets.clone(),
        max_concurrent_files: args.concurrency,
        persist_normalized: args.persist_normalized,
    };
    let config = ExtractionConfig::load_layered(args.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    let mut extractor = FeatureExtractor::new(config);
    if !args.show_progress() {
        extractor = extractor.without_progress();
    }

    let output = args.output_path();
    let stats = extractor
        .run(&args.master, &output)
        .await
        .with_context(|| format!("Feature extraction failed for {}", args.master.display()))?;

    if !args.logging.quiet {
        report_stats(&stats, args.format)?;
    }
    Ok(stats)
}
