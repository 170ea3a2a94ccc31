//! Error handling for feature extraction operations.
//!
//! Column-level "not computable" outcomes are never errors: they travel as
//! the `-1` sentinel inside a [`FeatureVector`](crate::models::FeatureVector).
//! The variants here cover file I/O, master table schema problems and the
//! internal statistic failures that reset a column to its sentinel default.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Invalid delimited file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Column '{column}' has {found} values, dataset has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Master table has {found} columns, expected at least {expected}")]
    MasterTableSchema { expected: usize, found: usize },

    #[error("Quartile {quartile} position {position} is outside {len} sorted values")]
    QuartileOutOfRange {
        quartile: u8,
        position: f64,
        len: usize,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, FeatureError>;
