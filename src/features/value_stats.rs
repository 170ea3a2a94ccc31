//! Value-level statistics of a single column.
//!
//! Every function returns the `-1` sentinel when the column cannot support
//! the feature, and clamps `NaN` results to `0`.
//!
//! Median and quartiles follow a fixed, non-textbook convention that feature
//! tables must reproduce exactly:
//!
//! - median: odd `N` takes index `N/2`, even `N` averages `N/2 - 1` and `N/2`
//! - quartile `q`: `pos = (N - 1) * q / 4 - 1`; an integral `pos` is used as
//!   an index, otherwise the two neighbours of `trunc(pos)` are averaged
//!   without distance weighting

use crate::constants::SENTINEL;
use crate::dataset::{Column, parse_number};
use crate::error::{FeatureError, Result};
use crate::features::clamp_nan;
use crate::features::type_inference::{infer_type, is_zero};
use crate::models::{DataType, StatisticValues, ValueRatio};
use std::collections::HashSet;

/// Positive / negative / zero shares of the parseable values.
///
/// Numeric columns divide by the row count, text columns by the number of
/// cells that parsed. A text column with no parseable cell is all sentinel.
pub fn sign_ratios(column: &Column) -> ValueRatio {
    let (values, denominator) = match column {
        Column::Numeric(values) => (values.clone(), values.len()),
        Column::Text(values) => {
            let parsed: Vec<f64> = values.iter().filter_map(|v| parse_number(v)).collect();
            if parsed.is_empty() {
                return ValueRatio::default();
            }
            let count = parsed.len();
            (parsed, count)
        }
        Column::Unsupported(_) => return ValueRatio::default(),
    };

    let (mut positive, mut negative, mut zero) = (0usize, 0usize, 0usize);
    for v in values {
        if is_zero(v) {
            zero += 1;
        } else if v > 0.0 {
            positive += 1;
        } else {
            negative += 1;
        }
    }

    let denominator = denominator as f64;
    ValueRatio {
        positive: clamp_nan(positive as f64 / denominator),
        negative: clamp_nan(negative as f64 / denominator),
        zero: clamp_nan(zero as f64 / denominator),
    }
}

/// Distinct stringified values divided by the row count
pub fn unique_value_ratio(column: &Column) -> f64 {
    let Some(values) = column.display_values() else {
        return SENTINEL;
    };

    let distinct: HashSet<&str> = values.iter().map(|v| v.as_ref()).collect();
    clamp_nan(distinct.len() as f64 / values.len() as f64)
}

/// `1` when every value of an integer column has the same printed length
pub fn same_digital_length(column: &Column) -> i8 {
    same_digital_length_for(column, infer_type(column))
}

pub(crate) fn same_digital_length_for(column: &Column, data_type: DataType) -> i8 {
    match data_type {
        DataType::Unknown => return -1,
        DataType::Float => return 0,
        DataType::Integer => {}
    }

    let Some(values) = column.display_values() else {
        return -1;
    };

    let lengths: HashSet<usize> = values.iter().map(|v| v.chars().count()).collect();
    if lengths.len() == 1 { 1 } else { 0 }
}

/// Average, extremes, median and quartiles of the parseable values.
///
/// Returns the all-sentinel result when nothing parses. A column with a
/// single value has no valid lower quartile index and fails with
/// [`FeatureError::QuartileOutOfRange`].
pub fn statistic_values(column: &Column) -> Result<StatisticValues> {
    let Some(mut values) = column.numeric_values() else {
        return Ok(StatisticValues::default());
    };
    if values.is_empty() {
        return Ok(StatisticValues::default());
    }

    let average = mean(&values);
    let minimum = nan_aware_min(&values);
    let maximum = nan_aware_max(&values);

    values.sort_by(f64::total_cmp);
    let median = median(&values);

    let lower_quartile = quartile(&values, 1)?;
    quartile(&values, 2)?;
    let upper_quartile = quartile(&values, 3)?;

    Ok(StatisticValues {
        average: clamp_nan(average),
        minimum: clamp_nan(minimum),
        maximum: clamp_nan(maximum),
        median: clamp_nan(median),
        upper_quartile: clamp_nan(upper_quartile),
        lower_quartile: clamp_nan(lower_quartile),
    })
}

/// Median of an already sorted, non-empty slice
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2] + sorted[n / 2 - 1]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Quartile `q` (1 = lower, 2 = middle, 3 = upper) of a sorted slice
pub fn quartile(sorted: &[f64], q: u8) -> Result<f64> {
    let out_of_range = |position: f64| FeatureError::QuartileOutOfRange {
        quartile: q,
        position,
        len: sorted.len(),
    };

    let length = sorted.len().saturating_sub(1) as f64;
    let position = length * (f64::from(q) * 25.0 / 100.0) - 1.0;

    if position.fract() == 0.0 {
        if position < 0.0 {
            return Err(out_of_range(position));
        }
        return sorted
            .get(position as usize)
            .copied()
            .ok_or_else(|| out_of_range(position));
    }

    // truncation toward zero: -0.5 reads indices 0 and 1
    let index = position.trunc().max(0.0) as usize;
    match (sorted.get(index), sorted.get(index + 1)) {
        (Some(low), Some(high)) => Ok((low + high) / 2.0),
        _ => Err(out_of_range(position)),
    }
}

/// Population standard deviation over the mean.
///
/// A mean of exactly zero returns the undivided standard deviation.
pub fn coefficient_of_variation(column: &Column) -> f64 {
    let Some(values) = column.numeric_values() else {
        return SENTINEL;
    };
    if values.is_empty() {
        return SENTINEL;
    }

    let average = mean(&values);
    let squared: f64 = values.iter().map(|v| (v - average) * (v - average)).sum();
    let std_dev = (squared / values.len() as f64).sqrt();

    if is_zero(average) {
        return clamp_nan(std_dev);
    }

    clamp_nan(std_dev / average)
}

/// Value range divided by the number of distinct parseable values
pub fn range_ratio(column: &Column) -> f64 {
    let Some(values) = column.numeric_values() else {
        return SENTINEL;
    };

    // bit-level identity: NaN equals NaN, 0.0 differs from -0.0
    let mut seen = HashSet::new();
    let distinct: Vec<f64> = values
        .into_iter()
        .filter(|v| {
            let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
            seen.insert(bits)
        })
        .collect();

    if distinct.is_empty() {
        return SENTINEL;
    }

    let range = nan_aware_max(&distinct) - nan_aware_min(&distinct);
    clamp_nan(range / distinct.len() as f64)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn nan_aware_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() { f64::NAN } else { acc.min(v) }
    })
}

fn nan_aware_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() { f64::NAN } else { acc.max(v) }
    })
}
