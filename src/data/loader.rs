use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, StringArray};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    COMPOSITE_KEY_LABEL, CategoryKey, MeltedTable, RawObservation, SourceTable, WideRow,
    WideTable,
};
use crate::config::SourceFormat;
use crate::error::LoadError;

/// Accepted names for the region field in record-oriented sources, by priority.
const REGION_FIELDS: [&str; 3] = ["region", "geo", "country"];
/// Accepted names for the value field in record-oriented sources, by priority.
const VALUE_FIELDS: [&str; 2] = ["value", "life_expectancy"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Reads a source file into a [`SourceTable`].
pub trait FormatLoader {
    fn read(&self, path: &Path) -> Result<SourceTable, LoadError>;
}

impl SourceFormat {
    /// Loader implementing this format.
    pub fn loader(&self) -> Box<dyn FormatLoader> {
        match self {
            SourceFormat::Tsv => Box::new(TsvLoader),
            SourceFormat::Json => Box::new(JsonLoader),
            SourceFormat::Parquet => Box::new(ParquetLoader),
        }
    }
}

/// Load `path` with the loader for `format`.
pub fn load_data(path: &Path, format: SourceFormat) -> Result<SourceTable, LoadError> {
    let table = format.loader().read(path)?;
    log::debug!("loaded {} row(s) from {} as {format}", table.len(), path.display());
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn layout_error(path: &Path, reason: impl Into<String>) -> LoadError {
    LoadError::Layout {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// TSV loader
// ---------------------------------------------------------------------------

/// Tab-delimited Eurostat extract.
///
/// ```text
/// unit,sex,age,geo\time	2021 	2020 	...
/// YR,F,Y1,AT	82.9 	82.7 	...
/// YR,F,Y1,PT	: 	81.4 e	...
/// ```
///
/// The first column holds the composite key; every other column is a year.
/// Cells are kept as raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvLoader;

impl TsvLoader {
    /// Parse tab-delimited text from any reader. `path` is only used in errors.
    pub fn read_from<R: Read>(&self, reader: R, path: &Path) -> Result<WideTable, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| parse_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        if headers[0].trim() != COMPOSITE_KEY_LABEL {
            return Err(layout_error(
                path,
                format!(
                    "first column is '{}', expected '{COMPOSITE_KEY_LABEL}'",
                    headers[0]
                ),
            ));
        }
        if headers.len() < 2 {
            return Err(layout_error(path, "no year columns"));
        }

        let mut rows = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            let record = result.map_err(|e| parse_error(path, format!("row {row_no}: {e}")))?;
            let mut fields = record.iter().map(str::to_string);
            let key = fields.next().unwrap_or_default();
            rows.push(WideRow {
                key,
                cells: fields.collect(),
            });
        }

        if rows.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(WideTable {
            year_columns: headers[1..].to_vec(),
            rows,
        })
    }
}

impl FormatLoader for TsvLoader {
    fn read(&self, path: &Path) -> Result<SourceTable, LoadError> {
        let file = open(path)?;
        self.read_from(file, path).map(SourceTable::Wide)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Record-oriented JSON, the layout of `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "unit": "YR", "sex": "F", "age": "Y65", "country": "PT",
///     "year": 2019, "life_expectancy": 21.3, "flag": null },
///   ...
/// ]
/// ```
///
/// The region field may be named `region`, `geo` or `country`; the value field
/// `value` or `life_expectancy`. Other fields are ignored. A `null` value is
/// read as empty text and is dropped during normalisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    /// Parse JSON text. `path` is only used in errors.
    pub fn read_str(&self, text: &str, path: &Path) -> Result<MeltedTable, LoadError> {
        let root: JsonValue = serde_json::from_str(text).map_err(|e| parse_error(path, e))?;
        let records = root
            .as_array()
            .ok_or_else(|| layout_error(path, "expected top-level JSON array"))?;

        if records.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        let rows = records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let obj = rec
                    .as_object()
                    .ok_or_else(|| layout_error(path, format!("record {i} is not a JSON object")))?;
                json_observation(obj, i, path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeltedTable { rows })
    }
}

impl FormatLoader for JsonLoader {
    fn read(&self, path: &Path) -> Result<SourceTable, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_str(&text, path).map(SourceTable::Long)
    }
}

fn json_observation(
    obj: &Map<String, JsonValue>,
    record: usize,
    path: &Path,
) -> Result<RawObservation, LoadError> {
    let field = |names: &[&str]| -> Result<String, LoadError> {
        names
            .iter()
            .find_map(|name| obj.get(*name))
            .map(json_to_text)
            .ok_or_else(|| {
                layout_error(
                    path,
                    format!("record {record} is missing field '{}'", names.join("' / '")),
                )
            })
    };

    Ok(RawObservation {
        key: CategoryKey {
            unit: field(&["unit"])?,
            sex: field(&["sex"])?,
            age: field(&["age"])?,
            region: field(&REGION_FIELDS)?,
        },
        year: field(&["year"])?,
        value: field(&VALUE_FIELDS)?,
    })
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Long-format records in a Parquet file.
///
/// Expected columns (extra columns are ignored):
/// - `unit`, `sex`, `age`: Utf8
/// - `region` (or `geo` / `country`): Utf8
/// - `year`: any integer or Utf8 type
/// - `value` (or `life_expectancy`): any float or Utf8 type; nulls are dropped
///   during normalisation
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetLoader;

impl FormatLoader for ParquetLoader {
    fn read(&self, path: &Path) -> Result<SourceTable, LoadError> {
        let file = open(path)?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| parse_error(path, e))?;
        let reader = builder.build().map_err(|e| parse_error(path, e))?;

        let mut rows = Vec::new();
        for batch_result in reader {
            let batch = batch_result.map_err(|e| parse_error(path, e))?;
            append_batch(&batch, path, &mut rows)?;
        }

        if rows.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(SourceTable::Long(MeltedTable { rows }))
    }
}

fn append_batch(
    batch: &RecordBatch,
    path: &Path,
    rows: &mut Vec<RawObservation>,
) -> Result<(), LoadError> {
    let unit = column(batch, &["unit"], path)?;
    let sex = column(batch, &["sex"], path)?;
    let age = column(batch, &["age"], path)?;
    let region = column(batch, &REGION_FIELDS, path)?;
    let year = column(batch, &["year"], path)?;
    let value = column(batch, &VALUE_FIELDS, path)?;

    for row in 0..batch.num_rows() {
        let text = |col: &Arc<dyn Array>| {
            cell_text(col, row).map_err(|e| parse_error(path, format!("row {row}: {e}")))
        };
        rows.push(RawObservation {
            key: CategoryKey {
                unit: text(unit)?,
                sex: text(sex)?,
                age: text(age)?,
                region: text(region)?,
            },
            year: text(year)?,
            value: text(value)?,
        });
    }
    Ok(())
}

fn column<'a>(
    batch: &'a RecordBatch,
    names: &[&str],
    path: &Path,
) -> Result<&'a Arc<dyn Array>, LoadError> {
    column_index(&batch.schema(), names)
        .map(|idx| batch.column(idx))
        .ok_or_else(|| {
            layout_error(
                path,
                format!("Parquet file missing '{}' column", names.join("' / '")),
            )
        })
}

fn column_index(schema: &Schema, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| schema.index_of(name).ok())
}

/// Render one Arrow cell as text; nulls become the empty string.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Result<String, arrow::error::ArrowError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    match col.data_type() {
        DataType::Utf8 => match col.as_any().downcast_ref::<StringArray>() {
            Some(s) => Ok(s.value(row).to_string()),
            None => array_value_to_string(col, row),
        },
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        _ => array_value_to_string(col, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn inline() -> PathBuf {
        PathBuf::from("inline")
    }

    #[test]
    fn test_tsv_reads_key_and_year_columns() {
        let text = "unit,sex,age,geo\\time\t2021 \t2020 \nYR,F,Y1,AT\t82.9 \t: \nYR,M,Y1,PT\t78.1 e\t77.7 \n";
        let table = TsvLoader.read_from(text.as_bytes(), &inline()).unwrap();
        assert_eq!(table.year_columns, vec!["2021 ", "2020 "]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].key, "YR,F,Y1,AT");
        assert_eq!(table.rows[0].cells, vec!["82.9 ", ": "]);
        assert_eq!(table.rows[1].cells, vec!["78.1 e", "77.7 "]);
    }

    #[test]
    fn test_tsv_empty_source() {
        let err = TsvLoader.read_from("".as_bytes(), &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn test_tsv_header_only_is_empty() {
        let text = "unit,sex,age,geo\\time\t2021 \n";
        let err = TsvLoader.read_from(text.as_bytes(), &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn test_tsv_wrong_key_header() {
        let text = "country\t2021 \nPT\t81.0 \n";
        let err = TsvLoader.read_from(text.as_bytes(), &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn test_tsv_without_year_columns() {
        let text = "unit,sex,age,geo\\time\nYR,F,Y1,PT\n";
        let err = TsvLoader.read_from(text.as_bytes(), &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn test_tsv_ragged_row() {
        let text = "unit,sex,age,geo\\time\t2021 \t2020 \nYR,F,Y1,PT\t81.0 \n";
        let err = TsvLoader.read_from(text.as_bytes(), &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_json_records_with_aliases() {
        let text = r#"[
            {"unit": "YR", "sex": "F", "age": "Y65", "country": "PT",
             "year": 2019, "life_expectancy": 21.3, "flag": null},
            {"unit": "YR", "sex": "M", "age": "Y65", "region": "PT",
             "year": "2020", "value": null}
        ]"#;
        let table = JsonLoader.read_str(text, &inline()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].key.region, "PT");
        assert_eq!(table.rows[0].year, "2019");
        assert_eq!(table.rows[0].value, "21.3");
        assert_eq!(table.rows[1].year, "2020");
        assert_eq!(table.rows[1].value, "");
    }

    #[test]
    fn test_json_not_an_array() {
        let err = JsonLoader.read_str(r#"{"unit": "YR"}"#, &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn test_json_missing_field() {
        let text = r#"[{"unit": "YR", "sex": "F", "age": "Y65", "year": 2019, "value": 1.0}]"#;
        let err = JsonLoader.read_str(text, &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Layout { .. }));
    }

    #[test]
    fn test_json_empty_array() {
        let err = JsonLoader.read_str("[]", &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn test_json_invalid_syntax() {
        let err = JsonLoader.read_str("[{", &inline()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_data(Path::new("does/not/exist.tsv"), SourceFormat::Tsv).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
