//! The master feature table.
//!
//! One row per (domain, file, column) triple, with the 17 engineered
//! features in columns 4 through 20. Extraction fills the feature cells of
//! rows whose file and column name match; every other cell is carried
//! through unchanged.

use crate::constants::{
    COLUMN_NAME_COLUMN, DATASET_EXTENSION, DOMAIN_COLUMN, FEATURE_COUNT, FILE_COLUMN,
    FIRST_FEATURE_COLUMN, MASTER_TABLE_HEADER, MASTER_TABLE_WIDTH, RESERVED_COLUMN,
};
use crate::dataset::{Column, Dataset, parse_number};
use crate::error::{FeatureError, Result};
use crate::io;
use crate::models::ColumnFeatures;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One row of the master table
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRow {
    pub domain: String,
    pub file_name: String,
    pub column_name: String,
    /// Label column, kept verbatim
    pub reserved: String,
    /// Feature cells in header order; `None` for an empty cell
    pub features: [Option<f64>; FEATURE_COUNT],
    /// Cells after the last feature column
    pub extra: Vec<String>,
}

impl MasterRow {
    /// Row with empty label and feature cells
    pub fn new(
        domain: impl Into<String>,
        file_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            file_name: file_name.into(),
            column_name: column_name.into(),
            reserved: String::new(),
            features: [None; FEATURE_COUNT],
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterTable {
    header: Vec<String>,
    rows: Vec<MasterRow>,
}

impl Default for MasterTable {
    fn default() -> Self {
        Self {
            header: MASTER_TABLE_HEADER.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

impl MasterTable {
    /// Empty table with the standard header
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a master table, keeping every cell as text until parsed here
    pub fn read(path: &Path, separator: u8) -> Result<Self> {
        let dataset = io::read_text_dataset(path, separator)?;

        if dataset.column_count() < MASTER_TABLE_WIDTH {
            return Err(FeatureError::MasterTableSchema {
                expected: MASTER_TABLE_WIDTH,
                found: dataset.column_count(),
            });
        }

        let header = dataset
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let cell = |row: usize, column: usize| dataset.cell_string(row, column).unwrap_or_default();

        let rows = (0..dataset.row_count())
            .map(|row| {
                let mut features = [None; FEATURE_COUNT];
                for (offset, feature) in features.iter_mut().enumerate() {
                    *feature = parse_feature_cell(&cell(row, FIRST_FEATURE_COLUMN + offset));
                }

                MasterRow {
                    domain: cell(row, DOMAIN_COLUMN),
                    file_name: cell(row, FILE_COLUMN),
                    column_name: cell(row, COLUMN_NAME_COLUMN),
                    reserved: cell(row, RESERVED_COLUMN),
                    features,
                    extra: (MASTER_TABLE_WIDTH..dataset.column_count())
                        .map(|column| cell(row, column))
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        info!("Loaded master table {} with {} rows", path.display(), rows.len());
        Ok(Self { header, rows })
    }

    /// Build a fresh table from a `<root>/<domain>/<file>.csv` tree.
    ///
    /// Every column of every readable dataset gets one row with empty
    /// features. Files that cannot be read are logged and skipped.
    pub fn seed(root: &Path, separator: u8) -> Result<Self> {
        if !root.is_dir() {
            return Err(FeatureError::DatasetNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut table = Self::new();

        for entry in WalkDir::new(root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            let is_dataset = entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DATASET_EXTENSION));
            if !is_dataset {
                continue;
            }

            let domain = path
                .parent()
                .and_then(Path::file_name)
                .map(|d| d.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file_name = entry.file_name().to_string_lossy().into_owned();

            let dataset = match io::read_dataset(path, separator) {
                Ok(dataset) => dataset,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            debug!(
                "Seeding {} columns from {}/{}",
                dataset.column_count(),
                domain,
                file_name
            );
            for column_name in dataset.column_names() {
                table.push_row(MasterRow::new(&domain, &file_name, column_name));
            }
        }

        info!(
            "Seeded master table with {} rows from {}",
            table.len(),
            root.display()
        );
        Ok(table)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[MasterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: MasterRow) {
        self.rows.push(row);
    }

    /// Distinct (domain, file) pairs in first-seen row order
    pub fn datasets(&self) -> Vec<(String, String)> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| seen.insert((row.domain.as_str(), row.file_name.as_str())))
            .map(|row| (row.domain.clone(), row.file_name.clone()))
            .collect()
    }

    /// Overwrite the features of every row of `file_name` whose column name
    /// has an entry in `features`. Returns the number of rows updated.
    pub fn merge(&mut self, file_name: &str, features: &[ColumnFeatures]) -> usize {
        let mut updated = 0;

        for row in self.rows.iter_mut().filter(|r| r.file_name == file_name) {
            let Some(column) = features.iter().find(|f| f.column_name == row.column_name) else {
                debug!(
                    "No column '{}' in {}, row left unchanged",
                    row.column_name, file_name
                );
                continue;
            };

            row.features = column.features.to_row().map(Some);
            updated += 1;
        }

        updated
    }

    /// Persist the table with its original header
    pub fn write(&self, path: &Path, separator: u8) -> Result<()> {
        let mut columns = vec![
            text_column(&self.rows, |r| r.domain.as_str()),
            text_column(&self.rows, |r| r.file_name.as_str()),
            text_column(&self.rows, |r| r.column_name.as_str()),
            text_column(&self.rows, |r| r.reserved.as_str()),
        ];
        for offset in 0..FEATURE_COUNT {
            columns.push(Column::Numeric(
                self.rows
                    .iter()
                    .map(|r| r.features[offset].unwrap_or(f64::NAN))
                    .collect(),
            ));
        }
        for offset in 0..self.header.len().saturating_sub(MASTER_TABLE_WIDTH) {
            columns.push(Column::Text(
                self.rows
                    .iter()
                    .map(|r| r.extra.get(offset).cloned().unwrap_or_default())
                    .collect(),
            ));
        }

        let mut dataset = Dataset::new(self.rows.len());
        for (name, column) in self.header.iter().zip(columns) {
            dataset.add_column(name.as_str(), column)?;
        }

        io::write_dataset(&dataset, path, separator)?;
        info!("Wrote master table {} ({} rows)", path.display(), self.len());
        Ok(())
    }
}

fn text_column(rows: &[MasterRow], cell: impl Fn(&MasterRow) -> &str) -> Column {
    Column::Text(rows.iter().map(|r| cell(r).to_string()).collect())
}

/// Feature cells as written by [`MasterTable::write`]: infinities come out
/// as `inf`/`-inf`, which the dataset number parser rejects
fn parse_feature_cell(raw: &str) -> Option<f64> {
    match raw.trim() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        cell => parse_number(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureVector;
    use std::fs;
    use tempfile::TempDir;

    fn sample_table() -> MasterTable {
        let mut table = MasterTable::new();
        table.push_row(MasterRow::new("shop", "orders.csv", "id"));
        table.push_row(MasterRow::new("shop", "orders.csv", "price"));
        table.push_row(MasterRow::new("shop", "customers.csv", "id"));
        table.push_row(MasterRow::new("shop", "orders.csv", "missing"));
        table
    }

    fn features(column_name: &str, location_ratio: f64) -> ColumnFeatures {
        ColumnFeatures {
            column_name: column_name.to_string(),
            features: FeatureVector {
                location_ratio,
                ..FeatureVector::default()
            },
        }
    }

    #[test]
    fn test_datasets_are_distinct_in_row_order() {
        assert_eq!(
            sample_table().datasets(),
            vec![
                ("shop".to_string(), "orders.csv".to_string()),
                ("shop".to_string(), "customers.csv".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_matches_file_and_column() {
        let mut table = sample_table();
        let updated = table.merge(
            "orders.csv",
            &[features("id", 0.0), features("price", 1.0), features("extra", 0.5)],
        );

        assert_eq!(updated, 2);
        assert_eq!(table.rows()[0].features[14], Some(0.0));
        assert_eq!(table.rows()[1].features[14], Some(1.0));
        assert_eq!(table.rows()[1].features[0], Some(-1.0));
        // other file and unmatched column untouched
        assert_eq!(table.rows()[2].features, [None; FEATURE_COUNT]);
        assert_eq!(table.rows()[3].features, [None; FEATURE_COUNT]);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");

        let mut table = sample_table();
        table.rows[0].reserved = "identifier".to_string();
        table.merge("orders.csv", &[features("id", 0.25)]);
        table.write(&path, b';').unwrap();

        let reread = MasterTable::read(&path, b';').unwrap();
        assert_eq!(reread.header(), table.header());
        assert_eq!(reread.len(), 4);
        assert_eq!(reread.rows()[0].reserved, "identifier");
        assert_eq!(reread.rows()[0].features[14], Some(0.25));
        assert_eq!(reread.rows()[0].features[0], Some(-1.0));
        assert_eq!(reread.rows()[1].reserved, "");
        assert_eq!(reread.rows()[1].features, [None; FEATURE_COUNT]);
    }

    #[test]
    fn test_infinite_features_survive_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");

        let mut table = sample_table();
        table.rows[0].features[6] = Some(f64::INFINITY);
        table.rows[0].features[7] = Some(1.0);
        table.rows[0].features[8] = Some(f64::INFINITY);
        table.rows[1].features[6] = Some(f64::NEG_INFINITY);
        table.write(&path, b';').unwrap();

        let reread = MasterTable::read(&path, b';').unwrap();
        assert_eq!(reread.rows()[0].features[6], Some(f64::INFINITY));
        assert_eq!(reread.rows()[0].features[7], Some(1.0));
        assert_eq!(reread.rows()[0].features[8], Some(f64::INFINITY));
        assert_eq!(reread.rows()[1].features[6], Some(f64::NEG_INFINITY));
        assert_eq!(reread.rows()[1].features[7], None);
    }

    #[test]
    fn test_feature_cells_accept_both_infinity_spellings() {
        assert_eq!(parse_feature_cell("inf"), Some(f64::INFINITY));
        assert_eq!(parse_feature_cell("-inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_feature_cell("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_feature_cell("0.5"), Some(0.5));
        assert_eq!(parse_feature_cell(""), None);
        assert_eq!(parse_feature_cell("n/a"), None);
    }

    #[test]
    fn test_read_keeps_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");

        let mut header = MASTER_TABLE_HEADER.join(";");
        header.push_str(";note");
        let mut row = vec!["d", "f.csv", "c", "x"];
        row.extend(["1"; FEATURE_COUNT]);
        row.push("keep me");
        fs::write(&path, format!("{}\n{}\n", header, row.join(";"))).unwrap();

        let table = MasterTable::read(&path, b';').unwrap();
        assert_eq!(table.header().len(), MASTER_TABLE_WIDTH + 1);
        assert_eq!(table.rows()[0].extra, vec!["keep me"]);
        assert_eq!(table.rows()[0].features, [Some(1.0); FEATURE_COUNT]);

        let out = dir.path().join("out.csv");
        table.write(&out, b';').unwrap();
        assert_eq!(MasterTable::read(&out, b';').unwrap().rows()[0].extra, vec!["keep me"]);
    }

    #[test]
    fn test_read_rejects_narrow_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("narrow.csv");
        fs::write(&path, "domain;file;column\nd;f.csv;c\n").unwrap();

        let err = MasterTable::read(&path, b';').unwrap_err();
        assert!(matches!(
            err,
            FeatureError::MasterTableSchema {
                expected: MASTER_TABLE_WIDTH,
                found: 3
            }
        ));
    }

    #[test]
    fn test_seed_from_directory_tree() {
        let dir = TempDir::new().unwrap();
        let shop = dir.path().join("shop");
        fs::create_dir_all(&shop).unwrap();
        fs::write(shop.join("orders.csv"), "id,price\n1,2.5\n").unwrap();
        fs::write(shop.join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("top.csv"), "a\n1\n").unwrap();

        let table = MasterTable::seed(dir.path(), b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], MasterRow::new("shop", "orders.csv", "id"));
        assert_eq!(table.rows()[1].column_name, "price");
    }

    #[test]
    fn test_seed_missing_root() {
        let err = MasterTable::seed(Path::new("/nonexistent/datasets"), b',').unwrap_err();
        assert!(matches!(err, FeatureError::DatasetNotFound { .. }));
    }
}
