use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataError;
use super::model::CyclerTable;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// List the data files directly inside `dir` whose extension is one of
/// `extensions` (case-insensitive), sorted by file name.
pub fn discover_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, DataError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DataError::read(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::read(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load one cycler data file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one sample per row
/// * `.parquet` – flat integer / float columns, one sample per row
///
/// Only numeric columns are kept; text columns such as timestamps are skipped.
pub fn load_table(path: &Path) -> Result<CyclerTable, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = file_name(path);
    let table = match ext.as_str() {
        "csv" => load_csv(path, name),
        "parquet" | "pq" => load_parquet(path, name),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    }
    .map_err(|e| DataError::read(path, e))?;

    log::debug!(
        "Loaded {} ({} rows, columns {:?})",
        table.name,
        table.len(),
        table.column_names().collect::<Vec<_>>()
    );
    Ok(table)
}

/// Display name of a data file (its final path component).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Cell contents read as a missing value (the Pandas `read_csv` defaults).
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// CSV layout: header row with column names, then one sample per row.
/// A column is numeric when every cell is a number or a missing-value token
/// (see [`NA_TOKENS`]); missing cells become NaN.
fn load_csv(path: &Path, name: String) -> Result<CyclerTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut numeric = vec![true; headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        for (col_idx, cell) in record.iter().enumerate() {
            if !numeric[col_idx] {
                continue;
            }
            let cell = cell.trim();
            if is_missing(cell) {
                values[col_idx].push(f64::NAN);
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => values[col_idx].push(v),
                Err(_) => {
                    log::debug!(
                        "{name}: column '{}' is not numeric (row {row_no}: '{cell}'), skipping",
                        headers[col_idx]
                    );
                    numeric[col_idx] = false;
                    values[col_idx] = Vec::new();
                }
            }
        }
    }

    let mut table = CyclerTable::new(name);
    for ((header, column), is_numeric) in headers.into_iter().zip(values).zip(numeric) {
        if is_numeric {
            table.insert_column(header, column);
        }
    }
    if table.column_names().next().is_none() {
        bail!("CSV has no numeric columns");
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export with one sample per row.
///
/// Integer and float columns are widened to `f64` (nulls become NaN); all
/// other column types are skipped.  Works with files written by **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, name: String) -> Result<CyclerTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for (field, col) in schema.fields().iter().zip(batch.columns()) {
            if !is_numeric(col.data_type()) {
                continue;
            }
            let floats = cast(col, &DataType::Float64)
                .with_context(|| format!("converting column '{}' to f64", field.name()))?;
            let floats = floats
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?;

            columns
                .entry(field.name().clone())
                .or_default()
                .extend(floats.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    if columns.is_empty() {
        bail!("Parquet file has no numeric columns");
    }
    let mut table = CyclerTable::new(name);
    for (column, values) in columns {
        table.insert_column(column, values);
    }
    Ok(table)
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;
    use crate::data::model::{CYCLE_INDEX, TEST_TIME};

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_keeps_numeric_columns_and_skips_text() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cell.csv",
            "Date_Time,Test_Time,Cycle_Index,Current\n\
             2021-01-01 10:00,0,1,0.5\n\
             2021-01-01 10:01,60,1,\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.name, "cell.csv");
        assert_eq!(table.len(), 2);
        assert!(!table.has_column("Date_Time"));
        assert_eq!(table.column(TEST_TIME).unwrap(), &[0.0, 60.0]);
        let current = table.column("Current").unwrap();
        assert_eq!(current[0], 0.5);
        assert!(current[1].is_nan());
    }

    #[test]
    fn csv_missing_value_tokens_become_nan() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "na.csv",
            "Test_Time,Cycle_Index,Current\n\
             0,1,0.5\n\
             10,NA,N/A\n\
             20,2,null\n\
             30,2,#N/A\n\
             40,3,n/a\n\
             50,3,None\n",
        );

        let table = load_table(&path).unwrap();
        let current = table.column("Current").unwrap();
        assert_eq!(current[0], 0.5);
        assert!(current[1..].iter().all(|v| v.is_nan()));
        assert!(table.column(CYCLE_INDEX).unwrap()[1].is_nan());
        assert_eq!(table.max_cycle().unwrap(), Some(3));
    }

    #[test]
    fn ragged_csv_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "Test_Time,Cycle_Index\n0,1\n1,1,9\n");
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, DataError::FileRead { .. }), "{err}");
    }

    #[test]
    fn csv_without_numbers_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.csv", "comment\nhello\n");
        assert!(matches!(
            load_table(&path),
            Err(DataError::FileRead { .. })
        ));
    }

    #[test]
    fn missing_file_and_unknown_extension_are_read_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_table(&dir.path().join("gone.csv")),
            Err(DataError::FileRead { .. })
        ));
        let txt = write(&dir, "cell.txt", "Test_Time\n0\n");
        let err = load_table(&txt).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"), "{err}");
    }

    #[test]
    fn parquet_numeric_columns_are_widened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cell.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(TEST_TIME, DataType::Float64, true),
            Field::new(CYCLE_INDEX, DataType::Int64, false),
            Field::new("Date_Time", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(0.0), None, Some(20.0)])),
                Arc::new(Int64Array::from(vec![1, 1, 2])),
                Arc::new(StringArray::from(vec!["a", "b", "c"])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(CYCLE_INDEX).unwrap(), &[1.0, 1.0, 2.0]);
        let time = table.column(TEST_TIME).unwrap();
        assert!(time[1].is_nan());
        assert!(!table.has_column("Date_Time"));
    }

    #[test]
    fn discovery_filters_by_extension_and_sorts_by_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.csv", "x\n1\n");
        write(&dir, "A.CSV", "x\n1\n");
        write(&dir, "notes.txt", "x\n");
        std::fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let files = discover_files(dir.path(), &["csv".to_string()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["A.CSV", "b.csv"]);
    }

    #[test]
    fn discovery_of_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_files(&missing, &["csv".to_string()]),
            Err(DataError::FileRead { .. })
        ));
    }
}
