//! Features command: print the feature vectors of one dataset

use super::shared::setup_logging;
use crate::cli::args::{FeaturesArgs, OutputFormat};
use crate::config::ExtractionConfig;
use crate::constants::{FIRST_FEATURE_COLUMN, MASTER_TABLE_HEADER};
use crate::models::ColumnFeatures;
use crate::processor::process_file;
use anyhow::{Context, Result};
use colored::*;

pub fn run_features(args: FeaturesArgs) -> Result<Vec<ColumnFeatures>> {
    setup_logging(&args.logging)?;

    let mut config = ExtractionConfig::default().with_dataset_separator(args.separator);
    if args.no_normalize {
        config = config.without_unit_normalization();
    }
    config.validate().context("Invalid separator")?;

    let file = process_file(&args.file, &config)
        .with_context(|| format!("Failed to extract features from {}", args.file.display()))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&file.columns)
                .context("Failed to serialize features")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_feature_table(&file.columns),
    }
    Ok(file.columns)
}

fn print_feature_table(columns: &[ColumnFeatures]) {
    for column in columns {
        println!("{}", column.column_name.bright_green().bold());
        let names = &MASTER_TABLE_HEADER[FIRST_FEATURE_COLUMN..];
        for (name, value) in names.iter().zip(column.features.to_row()) {
            println!("  {:<26} {}", name.bright_cyan(), value);
        }
    }
}
