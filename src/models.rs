//! Core data structures for feature extraction.
//!
//! Defines the inferred column data type, the per-column feature vector and
//! its grouped sub-results, and the statistics reported after a run.

use crate::constants::{FEATURE_COUNT, SENTINEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inferred numeric type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DataType {
    /// Not numeric, unsupported, or too many unparseable cells
    #[default]
    Unknown,
    /// Real-valued majority
    Float,
    /// Integral majority (ties included)
    Integer,
}

impl DataType {
    /// Numeric code written to the master table
    pub fn code(&self) -> i8 {
        match self {
            DataType::Unknown => -1,
            DataType::Float => 0,
            DataType::Integer => 1,
        }
    }

    /// Whether the column carries numbers at all
    pub fn is_numeric(&self) -> bool {
        !matches!(self, DataType::Unknown)
    }
}

/// Share of positive, negative and zero values among parseable cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRatio {
    pub positive: f64,
    pub negative: f64,
    pub zero: f64,
}

impl Default for ValueRatio {
    fn default() -> Self {
        Self {
            positive: SENTINEL,
            negative: SENTINEL,
            zero: SENTINEL,
        }
    }
}

/// Central tendency and spread of the parseable values of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticValues {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub lower_quartile: f64,
}

impl Default for StatisticValues {
    fn default() -> Self {
        Self {
            average: SENTINEL,
            minimum: SENTINEL,
            maximum: SENTINEL,
            median: SENTINEL,
            upper_quartile: SENTINEL,
            lower_quartile: SENTINEL,
        }
    }
}

/// Every engineered feature of one dataset column.
///
/// The default value is the all-sentinel vector, used for columns whose
/// statistics could not be computed at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub data_type: DataType,
    pub value_ratio: ValueRatio,
    pub unique_value_ratio: f64,
    pub same_digital_length: i8,
    pub statistics: StatisticValues,
    pub coefficient_of_variation: f64,
    pub range_ratio: f64,
    pub location_ratio: f64,
    pub numerical_column_ratio: f64,
    pub numerical_neighbor: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            data_type: DataType::Unknown,
            value_ratio: ValueRatio::default(),
            unique_value_ratio: SENTINEL,
            same_digital_length: -1,
            statistics: StatisticValues::default(),
            coefficient_of_variation: SENTINEL,
            range_ratio: SENTINEL,
            location_ratio: SENTINEL,
            numerical_column_ratio: SENTINEL,
            numerical_neighbor: SENTINEL,
        }
    }
}

impl FeatureVector {
    /// Feature values in master table order (columns 4 through 20)
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.data_type.code()),
            self.value_ratio.positive,
            self.value_ratio.negative,
            self.value_ratio.zero,
            self.unique_value_ratio,
            f64::from(self.same_digital_length),
            self.statistics.average,
            self.statistics.minimum,
            self.statistics.maximum,
            self.statistics.median,
            self.statistics.upper_quartile,
            self.statistics.lower_quartile,
            self.coefficient_of_variation,
            self.range_ratio,
            self.location_ratio,
            self.numerical_column_ratio,
            self.numerical_neighbor,
        ]
    }
}

/// Features computed for one column of one dataset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFeatures {
    pub column_name: String,
    pub features: FeatureVector,
}

/// Processing statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub columns_extracted: usize,
    pub rows_updated: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Share of files that were read and processed successfully
    pub fn success_rate(&self) -> f64 {
        let total = self.files_processed + self.files_failed;
        if total == 0 {
            return 100.0;
        }
        self.files_processed as f64 / total as f64 * 100.0
    }
}
