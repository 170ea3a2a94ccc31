//! Feature extraction pipeline.
//!
//! Walks the distinct datasets named by a master table, computes the
//! features of every column of each file on a blocking task, and merges the
//! results back into the table. Files run concurrently up to
//! `max_concurrent_files`, but results are merged in master-table order so a
//! file name shared by two domains always resolves to the later one.

use crate::config::ExtractionConfig;
use crate::error::{FeatureError, Result};
use crate::features::extract_dataset_features;
use crate::io;
use crate::master_table::MasterTable;
use crate::models::{ColumnFeatures, ProcessingStats};
use crate::normalizer::normalize_units;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

/// Features of every column of one dataset file
#[derive(Debug, Clone)]
pub struct FileFeatures {
    pub path: PathBuf,
    pub columns: Vec<ColumnFeatures>,
    /// Number of unit rewrites applied before extraction
    pub normalized_columns: usize,
}

/// Load, normalize and extract one dataset file.
///
/// Runs synchronously; the dataset is owned by this call for its whole
/// lifetime.
pub fn process_file(path: &Path, config: &ExtractionConfig) -> Result<FileFeatures> {
    let separator = config.dataset_separator_byte()?;
    let mut dataset = io::read_dataset(path, separator)?;

    let normalized = if config.normalize_units {
        normalize_units(&mut dataset)
    } else {
        Vec::new()
    };

    if config.persist_normalized && !normalized.is_empty() {
        io::write_dataset(&dataset, path, separator)?;
        debug!(
            "Persisted {} normalized columns to {}",
            normalized.len(),
            path.display()
        );
    }

    let columns = extract_dataset_features(&dataset);
    debug!(
        "Extracted {} columns ({} rows) from {}",
        columns.len(),
        dataset.row_count(),
        path.display()
    );

    Ok(FileFeatures {
        path: path.to_path_buf(),
        columns,
        normalized_columns: normalized.len(),
    })
}

/// Drives extraction over a master table
pub struct FeatureExtractor {
    config: ExtractionConfig,
    show_progress: bool,
}

impl FeatureExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Disable the progress bar and console summary
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Read the master table, extract, and write the result to `output`
    pub async fn run(&self, master: &Path, output: &Path) -> Result<ProcessingStats> {
        let separator = self.config.master_separator_byte()?;
        let mut table = MasterTable::read(master, separator)?;

        let stats = self.extract(&mut table).await?;
        table.write(output, separator)?;

        Ok(ProcessingStats {
            output_path: output.to_path_buf(),
            ..stats
        })
    }

    /// Compute features for every dataset named in `table` and merge them in
    pub async fn extract(&self, table: &mut MasterTable) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let datasets = table.datasets();

        if self.show_progress {
            println!("{}", "Starting feature extraction".bright_green().bold());
            println!(
                "  {} {}",
                "Datasets root:".bright_cyan(),
                self.config.datasets_root.display()
            );
            println!(
                "  {} {} files, {} master rows",
                "Found".bright_green(),
                datasets.len().to_string().bright_white().bold(),
                table.len().to_string().bright_white().bold()
            );
        }

        if datasets.is_empty() {
            warn!("Master table names no datasets");
            return Ok(ProcessingStats {
                processing_time_ms: start_time.elapsed().as_millis(),
                ..ProcessingStats::default()
            });
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new(datasets.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .map_err(|e| FeatureError::Configuration {
                        message: format!("invalid progress template: {}", e),
                    })?
                    .progress_chars("#>-"),
            );
            pb.set_message("Extracting features");
            pb
        } else {
            ProgressBar::hidden()
        };

        let concurrent_limit = self.config.max_concurrent_files.clamp(1, datasets.len());
        debug!(
            "Processing {} files with concurrency {}",
            datasets.len(),
            concurrent_limit
        );

        let config = Arc::new(self.config.clone());
        let mut results = stream::iter(datasets)
            .map(|(domain, file_name)| {
                let config = Arc::clone(&config);
                let pb = pb.clone();
                async move {
                    let path = config.dataset_path(&domain, &file_name);
                    pb.set_message(format!("Processing: {}", file_name));

                    let job_path = path.clone();
                    let outcome = task::spawn_blocking(move || process_file(&job_path, &config))
                        .await
                        .unwrap_or_else(|e| {
                            Err(FeatureError::ProcessingFailed {
                                path: path.clone(),
                                reason: e.to_string(),
                            })
                        });
                    pb.inc(1);

                    (file_name, path, outcome)
                }
            })
            .buffered(concurrent_limit);

        let mut stats = ProcessingStats::default();
        while let Some((file_name, path, outcome)) = results.next().await {
            match outcome {
                Ok(file) => {
                    let updated = table.merge(&file_name, &file.columns);
                    debug!(
                        "Merged {} columns of {} into {} rows",
                        file.columns.len(),
                        file_name,
                        updated
                    );
                    stats.files_processed += 1;
                    stats.columns_extracted += file.columns.len();
                    stats.rows_updated += updated;
                }
                Err(e) => {
                    warn!("Problem reading {}, skipping: {}", path.display(), e);
                    stats.files_failed += 1;
                }
            }
        }

        pb.finish_with_message("All datasets processed");
        stats.processing_time_ms = start_time.elapsed().as_millis();

        info!(
            "Extracted {} columns from {} files ({} failed) in {}ms",
            stats.columns_extracted,
            stats.files_processed,
            stats.files_failed,
            stats.processing_time_ms
        );
        if self.show_progress {
            print_summary(&stats);
        }

        Ok(stats)
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Extraction Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {}",
        "Columns extracted:".bright_cyan(),
        stats.columns_extracted.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Rows updated:".bright_cyan(),
        stats.rows_updated.to_string().bright_white().bold()
    );
}
