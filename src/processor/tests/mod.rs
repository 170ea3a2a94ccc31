//! Tests for the extraction pipeline
//!
//! Each test builds a `<root>/<domain>/<file>.csv` tree in a temporary
//! directory and drives the extractor over a master table.

pub mod extraction;

use crate::config::ExtractionConfig;
use crate::master_table::MasterTable;
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_dataset_file(root: &Path, domain: &str, file_name: &str, content: &str) -> PathBuf {
    let dir = root.join(domain);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

pub fn test_config(root: &Path) -> ExtractionConfig {
    ExtractionConfig::default()
        .with_datasets_root(root)
        .with_max_concurrent_files(2)
}

pub fn seeded_master(root: &Path) -> MasterTable {
    MasterTable::seed(root, b',').unwrap()
}

/// Feature cells of the row for (file, column)
pub fn row_features(table: &MasterTable, file_name: &str, column: &str) -> Vec<Option<f64>> {
    table
        .rows()
        .iter()
        .find(|r| r.file_name == file_name && r.column_name == column)
        .map(|r| r.features.to_vec())
        .unwrap()
}

pub const ORDERS_CSV: &str = "id,price,weight\n1,9.5,10kg\n2,3.25,20kg\n3,7.0,30kg\n4,1.5,40kg\n";
