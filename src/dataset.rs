//! Column-major in-memory dataset.
//!
//! A [`Dataset`] is a list of named [`Column`]s sharing one row count. Each
//! column is a tagged variant, so feature code matches on the kind once
//! instead of re-checking predicates per cell.
//!
//! | Variant | Storage | Missing cell |
//! |---------|---------|--------------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` | `NaN` |
//! | [`Text`](Column::Text) | `Vec<String>` | `""` |
//! | [`Unsupported`](Column::Unsupported) | `Vec<String>` (verbatim) | `""` |

use crate::constants::INTEGRAL_FORMAT_LIMIT;
use crate::error::{FeatureError, Result};
use crate::features::infer_type;
use crate::models::DataType;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Values of a single dataset field
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
    /// Booleans, dates and anything else the feature engine ignores; cells
    /// are kept verbatim so the dataset can be written back unchanged
    Unsupported(Vec<String>),
}

impl Column {
    /// Short kind name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
            Column::Unsupported(_) => "unsupported",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) | Column::Unsupported(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values usable by numeric aggregates.
    ///
    /// Numeric columns yield every value (missing cells stay `NaN`); text
    /// columns yield only the cells that parse as numbers.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Column::Numeric(values) => Some(values.clone()),
            Column::Text(values) => Some(values.iter().filter_map(|v| parse_number(v)).collect()),
            Column::Unsupported(_) => None,
        }
    }

    /// Cell values as strings, numbers rendered with [`format_number`]
    pub fn display_values(&self) -> Option<Vec<Cow<'_, str>>> {
        match self {
            Column::Numeric(values) => Some(
                values
                    .iter()
                    .map(|&v| Cow::Owned(format_number(v)))
                    .collect(),
            ),
            Column::Text(values) => Some(values.iter().map(|v| Cow::Borrowed(v.as_str())).collect()),
            Column::Unsupported(_) => None,
        }
    }
}

/// A column together with its header name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn {
    pub name: String,
    pub column: Column,
}

/// Fully materialized tabular dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<NamedColumn>,
    row_count: usize,
    /// Inferred column types, filled on first use and reset on mutation
    types: OnceLock<Vec<DataType>>,
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.row_count == other.row_count && self.columns == other.columns
    }
}

impl Dataset {
    /// Create an empty dataset whose columns will hold `row_count` values
    pub fn new(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
            types: OnceLock::new(),
        }
    }

    /// Append a column, checking that its length matches the row count
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        let found = column.len();
        if found != self.row_count {
            return Err(FeatureError::ColumnLength {
                column: name,
                expected: self.row_count,
                found,
            });
        }
        self.columns.push(NamedColumn { name, column });
        self.types.take();
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&NamedColumn> {
        self.columns.get(index)
    }

    /// Mutable access to a column; drops the cached column types
    pub fn column_mut(&mut self, index: usize) -> Option<&mut NamedColumn> {
        self.types.take();
        self.columns.get_mut(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&NamedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Cell rendered as a string; numeric cells use [`format_number`]
    pub fn cell_string(&self, row: usize, column: usize) -> Option<String> {
        match &self.columns.get(column)?.column {
            Column::Numeric(values) => values.get(row).map(|&v| format_number(v)),
            Column::Text(values) | Column::Unsupported(values) => values.get(row).cloned(),
        }
    }

    /// Cell as a number; text cells are parsed and `None` when unparseable
    pub fn cell_numeric(&self, row: usize, column: usize) -> Option<f64> {
        match &self.columns.get(column)?.column {
            Column::Numeric(values) => values.get(row).copied(),
            Column::Text(values) => values.get(row).and_then(|v| parse_number(v)),
            Column::Unsupported(_) => None,
        }
    }

    /// Distinct labels of a text column in first-seen order
    pub fn categories(&self, column: usize) -> Vec<&str> {
        let Some(Column::Text(values)) = self.columns.get(column).map(|c| &c.column) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        values
            .iter()
            .map(String::as_str)
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Inferred data type of every column, in column order.
    ///
    /// Computed once and reused until a column is added or mutated.
    pub fn column_types(&self) -> &[DataType] {
        self.types
            .get_or_init(|| self.columns.iter().map(|c| infer_type(&c.column)).collect())
    }
}

/// Parse a cell as a double, returning `None` instead of failing.
///
/// Accepts surrounding ASCII whitespace and control characters, an
/// optional sign, decimal and exponent notation, a trailing `d`/`f` type
/// suffix and the literals `NaN` and
/// `Infinity`. Other words (`inf`, `nan`, `null`) are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_matches(|c: char| c <= ' ');
    if trimmed.is_empty() {
        return None;
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < trimmed.len() {
        return None;
    }
    let negative = trimmed.starts_with('-');

    match unsigned {
        "NaN" => return Some(f64::NAN),
        "Infinity" if negative => return Some(f64::NEG_INFINITY),
        "Infinity" => return Some(f64::INFINITY),
        _ => {}
    }

    let body = trimmed
        .strip_suffix(['d', 'D', 'f', 'F'])
        .unwrap_or(trimmed);

    let is_decimal = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal || !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    body.parse::<f64>().ok()
}

/// Render a number in the fixed decimal format used for uniqueness,
/// digit-length checks and CSV output.
///
/// Integral values below 1e15 in magnitude keep one fractional digit
/// (`3.0`, `-12.0`); everything else uses the shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGRAL_FORMAT_LIMIT {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
