//! CSV sink for the cleaned table.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::output_path;
use crate::data::model::{LongTable, OUTPUT_COLUMNS};
use crate::data::region::Region;
use crate::error::WriteError;

/// Serialise `table` as CSV: a header row, then one line per observation.
///
/// The header is always written, even for an empty table. No index column.
pub fn write_csv<W: Write>(table: &LongTable, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` to `<dir>/<region lower>_life_expectancy.csv`.
///
/// Data goes to a temporary file in `dir` that is renamed over the target once
/// complete, so a failure never leaves a partial file behind.
pub fn save_data(table: &LongTable, region: Region, dir: &Path) -> Result<PathBuf, WriteError> {
    let path = output_path(dir, region);
    let io_error = |source| WriteError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_error)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    write_csv(table, &mut tmp).map_err(|source| WriteError::Csv {
        path: path.clone(),
        source,
    })?;
    tmp.persist(&path).map_err(|e| io_error(e.error))?;

    log::info!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(path)
}
