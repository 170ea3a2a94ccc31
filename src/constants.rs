//! Application constants for column feature extraction
//!
//! Numeric thresholds shared by the feature engine, master table layout
//! indices, and default paths used by the CLI.

// =============================================================================
// Numeric Thresholds
// =============================================================================

/// Near-zero threshold: twice the smallest positive subnormal double.
///
/// Not `f64::EPSILON`: `|v| < ZERO_EPSILON` holds only for exact zero and the
/// smallest subnormal.
pub const ZERO_EPSILON: f64 = 2.0 * f64::from_bits(1);

/// Share of unparseable text cells above which a column is `Unknown`
pub const NON_NUMERIC_THRESHOLD: f64 = 0.8;

/// Value written for features that cannot be computed for a column
pub const SENTINEL: f64 = -1.0;

/// Largest magnitude for which integral values are printed with a `.0` suffix
pub const INTEGRAL_FORMAT_LIMIT: f64 = 1e15;

// =============================================================================
// Master Table Layout
// =============================================================================

/// Master table column holding the domain label
pub const DOMAIN_COLUMN: usize = 0;

/// Master table column holding the source file name
pub const FILE_COLUMN: usize = 1;

/// Master table column holding the dataset column name
pub const COLUMN_NAME_COLUMN: usize = 2;

/// Master table column kept verbatim and never written by extraction
pub const RESERVED_COLUMN: usize = 3;

/// First master table column holding a feature value
pub const FIRST_FEATURE_COLUMN: usize = 4;

/// Number of feature values per master table row
pub const FEATURE_COUNT: usize = 17;

/// Minimum number of columns a master table must have
pub const MASTER_TABLE_WIDTH: usize = FIRST_FEATURE_COLUMN + FEATURE_COUNT;

/// Header names used when seeding a new master table
pub const MASTER_TABLE_HEADER: [&str; MASTER_TABLE_WIDTH] = [
    "domain",
    "file",
    "column",
    "label",
    "data_type",
    "positive_ratio",
    "negative_ratio",
    "zero_ratio",
    "unique_value_ratio",
    "same_digital_length",
    "average",
    "minimum",
    "maximum",
    "median",
    "upper_quartile",
    "lower_quartile",
    "coefficient_of_variation",
    "range_ratio",
    "location_ratio",
    "numerical_column_ratio",
    "numerical_neighbor",
];

// =============================================================================
// Defaults
// =============================================================================

/// Default master feature table path
pub const DEFAULT_MASTER_TABLE: &str = "features.csv";

/// Default root directory holding `<domain>/<file>` datasets
pub const DEFAULT_DATASETS_ROOT: &str = "datasets";

/// Default separator for the master feature table
pub const DEFAULT_MASTER_SEPARATOR: char = ';';

/// Default separator for raw per-file datasets
pub const DEFAULT_DATASET_SEPARATOR: char = ',';

/// File extension picked up when seeding a master table
pub const DATASET_EXTENSION: &str = "csv";
