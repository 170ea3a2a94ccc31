//! Delimited file I/O backed by Polars.
//!
//! Reading infers a schema from the whole file and maps Polars dtypes onto
//! [`Column`] variants: integer and float columns become numeric, string
//! columns text, anything else (booleans, dates) unsupported. Writing goes
//! the other way, with missing numbers and empty strings as empty cells.

use crate::dataset::{Column, Dataset};
use crate::error::{FeatureError, Result};
use polars::prelude::{
    Column as PolarsColumn, CsvParseOptions, CsvReadOptions, CsvWriter, DataFrame,
    DataType as PolarsType, NamedFrom, SerReader, SerWriter, Series,
};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Read a delimited file with a header row into a typed [`Dataset`]
pub fn read_dataset(path: &Path, separator: u8) -> Result<Dataset> {
    let frame = read_frame(path, separator, None)?;
    dataset_from_frame(&frame)
}

/// Read a delimited file keeping every column as text
pub fn read_text_dataset(path: &Path, separator: u8) -> Result<Dataset> {
    let frame = read_frame(path, separator, Some(0))?;
    dataset_from_frame(&frame)
}

/// Write a dataset as a delimited file with a header row
pub fn write_dataset(dataset: &Dataset, path: &Path, separator: u8) -> Result<()> {
    let mut frame = frame_from_dataset(dataset)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .with_float_scientific(Some(false))
        .finish(&mut frame)?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(())
}

/// Convert a separator character to the single byte Polars expects
pub fn separator_byte(separator: char) -> Result<u8> {
    if separator.is_ascii() {
        Ok(separator as u8)
    } else {
        Err(FeatureError::Configuration {
            message: format!("separator '{separator}' is not a single ASCII character"),
        })
    }
}

fn read_frame(path: &Path, separator: u8, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    if !path.exists() {
        return Err(FeatureError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| FeatureError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}

fn dataset_from_frame(frame: &DataFrame) -> Result<Dataset> {
    let mut dataset = Dataset::new(frame.height());

    for column in frame.get_columns() {
        let series = column.as_materialized_series();
        let dtype = series.dtype();

        let converted = if dtype.is_integer() || dtype.is_float() {
            let floats = series.cast(&PolarsType::Float64)?;
            Column::Numeric(
                floats
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect(),
            )
        } else if matches!(dtype, PolarsType::String) {
            Column::Text(string_cells(series)?)
        } else {
            let rendered = series.cast(&PolarsType::String)?;
            Column::Unsupported(string_cells(&rendered)?)
        };

        dataset.add_column(column.name().to_string(), converted)?;
    }

    Ok(dataset)
}

fn string_cells(series: &Series) -> Result<Vec<String>> {
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn frame_from_dataset(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<PolarsColumn> = dataset
        .columns()
        .iter()
        .map(|named| {
            let name = named.name.as_str().into();
            let series = match &named.column {
                Column::Numeric(values) => {
                    let cells: Vec<Option<f64>> = values
                        .iter()
                        .map(|&v| if v.is_nan() { None } else { Some(v) })
                        .collect();
                    Series::new(name, cells)
                }
                Column::Text(values) | Column::Unsupported(values) => {
                    let cells: Vec<Option<&str>> = values
                        .iter()
                        .map(|v| if v.is_empty() { None } else { Some(v.as_str()) })
                        .collect();
                    Series::new(name, cells)
                }
            };
            series.into()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_dataset_maps_column_kinds() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "mixed.csv",
            "id,price,name,active\n1,2.5,ann,true\n2,,bob,false\n3,4.0,,true\n",
        );

        let dataset = read_dataset(&path, b',').unwrap();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_names(), vec!["id", "price", "name", "active"]);

        match &dataset.column(1).unwrap().column {
            Column::Numeric(values) => {
                assert_eq!(values[0], 2.5);
                assert!(values[1].is_nan());
            }
            other => panic!("expected numeric, got {}", other.kind()),
        }
        assert_eq!(
            dataset.column(2).unwrap().column,
            Column::Text(vec!["ann".into(), "bob".into(), "".into()])
        );
        assert_eq!(dataset.column(3).unwrap().column.kind(), "unsupported");
    }

    #[test]
    fn test_read_dataset_with_semicolons() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "semi.csv", "a;b\n1;x\n2;y\n");

        let dataset = read_dataset(&path, b';').unwrap();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.cell_numeric(1, 0), Some(2.0));
    }

    #[test]
    fn test_read_text_dataset_keeps_strings() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "text.csv", "a,b\n1,x\n2,y\n");

        let dataset = read_text_dataset(&path, b',').unwrap();
        assert_eq!(
            dataset.column(0).unwrap().column,
            Column::Text(vec!["1".into(), "2".into()])
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_dataset(Path::new("/nonexistent/data.csv"), b',').unwrap_err();
        assert!(matches!(err, FeatureError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("round.csv");

        let mut dataset = Dataset::new(3);
        dataset
            .add_column("value", Column::Numeric(vec![1.5, f64::NAN, -3.25]))
            .unwrap();
        dataset
            .add_column("label", Column::Text(vec!["a".into(), "b".into(), "c".into()]))
            .unwrap();

        write_dataset(&dataset, &path, b',').unwrap();
        let reread = read_dataset(&path, b',').unwrap();

        assert_eq!(reread.column_names(), dataset.column_names());
        assert_eq!(reread.row_count(), 3);
        assert_eq!(reread.cell_numeric(0, 0), Some(1.5));
        assert!(reread.cell_numeric(1, 0).unwrap().is_nan());
        assert_eq!(reread.cell_numeric(2, 0), Some(-3.25));
        assert_eq!(reread.cell_string(2, 1).as_deref(), Some("c"));
    }

    #[test]
    fn test_frame_from_dataset_nulls() {
        let mut dataset = Dataset::new(1);
        dataset
            .add_column("n", Column::Numeric(vec![f64::NAN]))
            .unwrap();
        dataset
            .add_column("t", Column::Text(vec!["x".into()]))
            .unwrap();

        let frame = frame_from_dataset(&dataset).unwrap();
        assert_eq!(frame.column("n").unwrap().null_count(), 1);
        assert_eq!(frame.column("t").unwrap().null_count(), 0);
        assert_eq!(frame.column("t").unwrap().dtype(), &PolarsType::String);
    }

    #[test]
    fn test_separator_byte() {
        assert_eq!(separator_byte(';').unwrap(), b';');
        assert!(separator_byte('§').is_err());
    }
}
