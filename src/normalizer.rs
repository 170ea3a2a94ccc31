//! Unit stripping for text columns.
//!
//! Columns such as `10kg, 20kg, 30kg` or `$5, $12` are numbers wearing a
//! constant unit. When every row of a text column has the same shape and the
//! same unit text, the unit is removed so the numeric features see plain
//! digits. Suffix units are tried first, then prefix units on the result.

use crate::dataset::{Column, Dataset};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SUFFIX_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[0-9]+)(?P<unit>[^0-9]+)$").expect("valid suffix unit pattern")
});

static PREFIX_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<unit>[^0-9]+)(?P<number>[0-9]+)$").expect("valid prefix unit pattern")
});

/// Where the stripped unit sat relative to the digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitPosition {
    Suffix,
    Prefix,
}

impl UnitPosition {
    fn pattern(&self) -> &'static Regex {
        match self {
            UnitPosition::Suffix => &SUFFIX_UNIT,
            UnitPosition::Prefix => &PREFIX_UNIT,
        }
    }
}

/// A column rewritten by [`normalize_units`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedColumn {
    pub index: usize,
    pub name: String,
    pub position: UnitPosition,
}

/// Strip a consistent unit from every text column of the dataset, in place.
///
/// Returns one entry per applied rewrite; a column can appear twice when a
/// suffix and then a prefix were removed.
pub fn normalize_units(dataset: &mut Dataset) -> Vec<NormalizedColumn> {
    let mut normalized = Vec::new();

    for index in 0..dataset.column_count() {
        let Some(named) = dataset.column_mut(index) else {
            continue;
        };
        let Column::Text(values) = &mut named.column else {
            continue;
        };

        for position in [UnitPosition::Suffix, UnitPosition::Prefix] {
            if strip_unit(values, position) {
                debug!("Stripped {:?} unit from column '{}'", position, named.name);
                normalized.push(NormalizedColumn {
                    index,
                    name: named.name.clone(),
                    position,
                });
            }
        }
    }

    normalized
}

/// Rewrite `values` to their digits when every row matches `position` with
/// identical unit text. Leaves the values untouched otherwise.
fn strip_unit(values: &mut [String], position: UnitPosition) -> bool {
    let Some(numbers) = consistent_numbers(values, position) else {
        return false;
    };

    for (value, number) in values.iter_mut().zip(numbers) {
        *value = number;
    }
    true
}

fn consistent_numbers(values: &[String], position: UnitPosition) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }

    let pattern = position.pattern();
    let mut unit: Option<&str> = None;
    let mut numbers = Vec::with_capacity(values.len());

    for value in values {
        let captures = pattern.captures(value)?;
        let cell_unit = captures.name("unit")?.as_str();

        match unit {
            None => unit = Some(cell_unit),
            Some(expected) if expected != cell_unit => return None,
            Some(_) => {}
        }

        numbers.push(captures.name("number")?.as_str().to_string());
    }

    Some(numbers)
}
