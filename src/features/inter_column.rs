//! Features that depend on a column's position and its neighbours.

use crate::dataset::Dataset;
use crate::features::clamp_nan;
use crate::models::DataType;

/// Relative position of a column, `0` for the first and `1` for the last.
///
/// Single-column datasets divide by zero and clamp to `0`.
pub fn location_ratio(total_columns: usize, index: usize) -> f64 {
    clamp_nan(index as f64 / (total_columns as f64 - 1.0))
}

/// Share of the dataset's columns with a numeric data type
pub fn numerical_column_ratio(dataset: &Dataset) -> f64 {
    numerical_column_ratio_for(dataset.column_types())
}

/// Local numeric contiguity of a column.
///
/// `0` when the column itself is not numeric. Edge columns score `1` when
/// their only neighbour is numeric. Interior columns score `1`, `0.5` or `0`
/// for two, one or no numeric neighbours.
pub fn numerical_neighbor(dataset: &Dataset, index: usize) -> f64 {
    numerical_neighbor_for(dataset.column_types(), index)
}

pub(crate) fn numerical_column_ratio_for(types: &[DataType]) -> f64 {
    let numeric = types.iter().filter(|t| t.is_numeric()).count();
    clamp_nan(numeric as f64 / types.len() as f64)
}

pub(crate) fn numerical_neighbor_for(types: &[DataType], index: usize) -> f64 {
    let is_numeric = |i: usize| types.get(i).is_some_and(DataType::is_numeric);

    if !is_numeric(index) || types.len() < 2 {
        return 0.0;
    }

    let last = types.len() - 1;
    if index == 0 {
        return if is_numeric(1) { 1.0 } else { 0.0 };
    }
    if index == last {
        return if is_numeric(last - 1) { 1.0 } else { 0.0 };
    }

    match (is_numeric(index - 1), is_numeric(index + 1)) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.5,
        (false, false) => 0.0,
    }
}
