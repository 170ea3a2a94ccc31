//! Column feature extraction.
//!
//! Computes a fixed set of engineered descriptors for every column of a
//! tabular dataset and merges them into a master feature table that serves
//! as training data for a column classifier.
//!
//! This library provides:
//! - Column type inference over numeric and numeric-looking text columns
//! - Sign, uniqueness and digit-length ratios
//! - Median, quartile, coefficient of variation and range statistics
//! - Positional and neighbour features across a dataset's columns
//! - Unit stripping (`10kg`, `$5`) ahead of the numeric features
//! - Concurrent extraction over a `<domain>/<file>` datasets tree
//!
//! Features that cannot be computed for a column are the `-1` sentinel,
//! never `NaN`.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod features;
pub mod io;
pub mod master_table;
pub mod models;
pub mod normalizer;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use config::ExtractionConfig;
pub use dataset::{Column, Dataset};
pub use error::{FeatureError, Result};
pub use features::{compute_features, extract_dataset_features};
pub use master_table::MasterTable;
pub use models::{ColumnFeatures, DataType, FeatureVector, ProcessingStats};
pub use normalizer::normalize_units;
pub use processor::FeatureExtractor;
