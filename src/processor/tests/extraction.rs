//! End-to-end extraction tests

use super::{ORDERS_CSV, row_features, seeded_master, test_config, write_dataset_file};
use crate::master_table::MasterTable;
use crate::processor::{FeatureExtractor, process_file};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_extract_updates_master_rows() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset_file(temp_dir.path(), "shop", "orders.csv", ORDERS_CSV);
    let mut table = seeded_master(temp_dir.path());

    let extractor = FeatureExtractor::new(test_config(temp_dir.path())).without_progress();
    let stats = extractor.extract(&mut table).await.unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.columns_extracted, 3);
    assert_eq!(stats.rows_updated, 3);

    let id = row_features(&table, "orders.csv", "id");
    assert_eq!(id[0], Some(1.0));
    assert_eq!(id[1], Some(1.0));
    assert_eq!(id[9], Some(2.5));
    assert_eq!(id[14], Some(0.0));
    assert_eq!(id[15], Some(1.0));
    assert_eq!(id[16], Some(1.0));

    let price = row_features(&table, "orders.csv", "price");
    assert_eq!(price[0], Some(0.0));
    assert_eq!(price[14], Some(0.5));

    // "10kg".."40kg" is stripped to integers before type inference
    let weight = row_features(&table, "orders.csv", "weight");
    assert_eq!(weight[0], Some(1.0));
    assert_eq!(weight[7], Some(10.0));
    assert_eq!(weight[8], Some(40.0));
}

#[tokio::test]
async fn test_extract_multiple_domains() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset_file(temp_dir.path(), "shop", "orders.csv", ORDERS_CSV);
    write_dataset_file(temp_dir.path(), "people", "names.csv", "name,age\nann,31\nbob,42\n");
    write_dataset_file(temp_dir.path(), "people", "towns.csv", "town\nleeds\nyork\n");
    let mut table = seeded_master(temp_dir.path());

    let extractor = FeatureExtractor::new(test_config(temp_dir.path())).without_progress();
    let stats = extractor.extract(&mut table).await.unwrap();

    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.rows_updated, 6);
    assert!(table.rows().iter().all(|r| r.features.iter().all(Option::is_some)));

    let name = row_features(&table, "names.csv", "name");
    assert_eq!(name[0], Some(-1.0));
    assert_eq!(name[15], Some(0.5));
    assert_eq!(name[16], Some(0.0));
}

#[tokio::test]
async fn test_unit_normalization_can_be_disabled() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset_file(temp_dir.path(), "shop", "orders.csv", ORDERS_CSV);
    let mut table = seeded_master(temp_dir.path());

    let config = test_config(temp_dir.path()).without_unit_normalization();
    FeatureExtractor::new(config)
        .without_progress()
        .extract(&mut table)
        .await
        .unwrap();

    let weight = row_features(&table, "orders.csv", "weight");
    assert_eq!(weight[0], Some(-1.0));
    assert_eq!(weight[7], Some(-1.0));
}

#[test]
fn test_process_file_persists_normalized_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_dataset_file(temp_dir.path(), "shop", "orders.csv", ORDERS_CSV);

    let config = test_config(temp_dir.path());
    let file = process_file(&path, &config).unwrap();
    assert_eq!(file.normalized_columns, 1);
    assert!(fs::read_to_string(&path).unwrap().contains("10kg"));

    let config = config.with_persist_normalized();
    process_file(&path, &config).unwrap();
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(!rewritten.contains("kg"));
    assert!(rewritten.starts_with("id,price,weight"));
}

#[tokio::test]
async fn test_run_writes_output_table() {
    let temp_dir = TempDir::new().unwrap();
    let datasets = temp_dir.path().join("datasets");
    write_dataset_file(&datasets, "shop", "orders.csv", ORDERS_CSV);

    let master = temp_dir.path().join("features.csv");
    seeded_master(&datasets).write(&master, b';').unwrap();
    let output = temp_dir.path().join("out").join("features.csv");

    let stats = FeatureExtractor::new(test_config(&datasets))
        .without_progress()
        .run(&master, &output)
        .await
        .unwrap();
    assert_eq!(stats.output_path, output);
    assert_eq!(stats.rows_updated, 3);

    let written = MasterTable::read(&output, b';').unwrap();
    assert_eq!(row_features(&written, "orders.csv", "id")[0], Some(1.0));

    // input table untouched when writing elsewhere
    let original = MasterTable::read(&master, b';').unwrap();
    assert_eq!(row_features(&original, "orders.csv", "id")[0], None);
}

#[tokio::test]
async fn test_shared_file_name_resolves_in_row_order() {
    let temp_dir = TempDir::new().unwrap();
    // the first domain's file is much larger, so it finishes last
    let mut large = String::from("value\n");
    for i in 1..=50_000 {
        large.push_str(&format!("{}\n", i));
    }
    write_dataset_file(temp_dir.path(), "a", "data.csv", &large);
    write_dataset_file(temp_dir.path(), "b", "data.csv", "value\n-1\n-2\n-3\n");
    let mut table = seeded_master(temp_dir.path());
    assert_eq!(table.rows()[0].domain, "a");

    let stats = FeatureExtractor::new(test_config(temp_dir.path()))
        .without_progress()
        .extract(&mut table)
        .await
        .unwrap();
    assert_eq!(stats.files_processed, 2);

    for row in table.rows() {
        assert_eq!(row.features[1], Some(0.0));
        assert_eq!(row.features[2], Some(1.0));
        assert_eq!(row.features[8], Some(-1.0));
    }
}

#[tokio::test]
async fn test_infinite_features_survive_output_table() {
    let temp_dir = TempDir::new().unwrap();
    let datasets = temp_dir.path().join("datasets");
    write_dataset_file(&datasets, "lab", "readings.csv", "value\n1\nInfinity\n2\n");

    let master = temp_dir.path().join("features.csv");
    seeded_master(&datasets).write(&master, b';').unwrap();

    FeatureExtractor::new(test_config(&datasets))
        .without_progress()
        .run(&master, &master)
        .await
        .unwrap();

    let written = MasterTable::read(&master, b';').unwrap();
    let value = row_features(&written, "readings.csv", "value");
    assert_eq!(value[6], Some(f64::INFINITY));
    assert_eq!(value[7], Some(1.0));
    assert_eq!(value[8], Some(f64::INFINITY));
}
