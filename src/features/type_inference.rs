//! Column data type inference.
//!
//! A column is `Integer` when at least half of its numeric values have no
//! fractional part, `Float` otherwise. Text columns first have to parse:
//! more than 80% unparseable cells makes them `Unknown`.

use crate::constants::{NON_NUMERIC_THRESHOLD, ZERO_EPSILON};
use crate::dataset::{Column, parse_number};
use crate::models::DataType;

/// Whether a value counts as exactly zero
pub fn is_zero(value: f64) -> bool {
    value.abs() < ZERO_EPSILON
}

/// Whether a value has no fractional part.
///
/// `NaN` and infinities are never integral.
pub fn is_integral(value: f64) -> bool {
    is_zero((value - value.floor()).abs())
}

/// Infer the data type of a column
pub fn infer_type(column: &Column) -> DataType {
    match column {
        Column::Numeric(values) => majority_type(values.iter().copied()),
        Column::Text(values) => {
            let parsed: Vec<f64> = values.iter().filter_map(|v| parse_number(v)).collect();
            let not_number = values.len() - parsed.len();

            if not_number as f64 > values.len() as f64 * NON_NUMERIC_THRESHOLD {
                return DataType::Unknown;
            }

            majority_type(parsed.into_iter())
        }
        Column::Unsupported(_) => DataType::Unknown,
    }
}

/// Integer/real majority vote; ties go to `Integer`
fn majority_type(values: impl Iterator<Item = f64>) -> DataType {
    let (integral, real) = values.fold((0usize, 0usize), |(integral, real), v| {
        if is_integral(v) {
            (integral + 1, real)
        } else {
            (integral, real + 1)
        }
    });

    if real > integral {
        DataType::Float
    } else {
        DataType::Integer
    }
}
