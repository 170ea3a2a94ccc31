//! Per-column feature computation.
//!
//! [`compute_features`] builds the full [`FeatureVector`] of one column;
//! [`extract_dataset_features`] does it for every column while inferring
//! each column's type only once.

pub mod inter_column;
pub mod type_inference;
pub mod value_stats;

pub use inter_column::{location_ratio, numerical_column_ratio, numerical_neighbor};
pub use type_inference::infer_type;
pub use value_stats::{
    coefficient_of_variation, range_ratio, same_digital_length, sign_ratios, statistic_values,
    unique_value_ratio,
};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{ColumnFeatures, DataType, FeatureVector};
use tracing::{debug, warn};

/// Replace `NaN` with `0`
pub fn clamp_nan(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

/// Compute every feature of column `index`.
///
/// Out-of-range indices and columns whose statistics fail produce the
/// all-sentinel [`FeatureVector::default`].
pub fn compute_features(dataset: &Dataset, index: usize) -> FeatureVector {
    let types = dataset.column_types();
    features_or_default(dataset, types, index)
}

/// Compute the features of every column of a dataset, in column order
pub fn extract_dataset_features(dataset: &Dataset) -> Vec<ColumnFeatures> {
    let types = dataset.column_types();

    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(index, named)| ColumnFeatures {
            column_name: named.name.clone(),
            features: features_or_default(dataset, types, index),
        })
        .collect()
}

fn features_or_default(dataset: &Dataset, types: &[DataType], index: usize) -> FeatureVector {
    match try_compute_features(dataset, types, index) {
        Ok(features) => features,
        Err(e) => {
            let name = dataset.column(index).map_or("?", |c| c.name.as_str());
            warn!("Column {} ('{}') reset to sentinel features: {}", index, name, e);
            FeatureVector::default()
        }
    }
}

fn try_compute_features(
    dataset: &Dataset,
    types: &[DataType],
    index: usize,
) -> Result<FeatureVector> {
    let Some(named) = dataset.column(index) else {
        return Ok(FeatureVector::default());
    };
    let column = &named.column;
    let data_type = types.get(index).copied().unwrap_or_default();

    debug!(
        "Computing features for column {} '{}' ({}, {:?})",
        index,
        named.name,
        column.kind(),
        data_type
    );

    Ok(FeatureVector {
        data_type,
        value_ratio: sign_ratios(column),
        unique_value_ratio: unique_value_ratio(column),
        same_digital_length: value_stats::same_digital_length_for(column, data_type),
        statistics: statistic_values(column)?,
        coefficient_of_variation: coefficient_of_variation(column),
        range_ratio: range_ratio(column),
        location_ratio: location_ratio(dataset.column_count(), index),
        numerical_column_ratio: inter_column::numerical_column_ratio_for(types),
        numerical_neighbor: inter_column::numerical_neighbor_for(types, index),
    })
}
