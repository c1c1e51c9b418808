use super::model::{CategoryKey, KeyedRow, KeyedTable, MeltedTable, RawObservation, WideTable};
use crate::error::ReshapeError;

/// Separator between the tokens of a composite key.
pub const KEY_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Key splitting
// ---------------------------------------------------------------------------

/// Split one composite key into `unit`, `sex`, `age`, `region`.
///
/// Tokens are taken verbatim; anything other than exactly four is an error.
pub fn split_key(key: &str, row: usize) -> Result<CategoryKey, ReshapeError> {
    let tokens: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    match tokens.as_slice() {
        [unit, sex, age, region] => Ok(CategoryKey {
            unit: (*unit).to_string(),
            sex: (*sex).to_string(),
            age: (*age).to_string(),
            region: (*region).to_string(),
        }),
        _ => Err(ReshapeError {
            row,
            key: key.to_string(),
            found: tokens.len(),
        }),
    }
}

/// Replace the composite key column with the four category fields.
///
/// Aborts on the first malformed key; no rows are recovered.
pub fn split_columns(table: &WideTable) -> Result<KeyedTable, ReshapeError> {
    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(KeyedRow {
                key: split_key(&row.key, i)?,
                cells: row.cells.clone(),
            })
        })
        .collect::<Result<Vec<_>, ReshapeError>>()?;

    log::debug!("split composite key for {} row(s)", rows.len());
    Ok(KeyedTable {
        year_columns: table.year_columns.clone(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// Wide → long
// ---------------------------------------------------------------------------

/// Unpivot one row per year column.
///
/// Output is grouped by year column in header order; within a block rows keep
/// their source order. A missing cell is read as empty text.
pub fn melt(table: &KeyedTable) -> MeltedTable {
    let mut rows = Vec::with_capacity(table.rows.len() * table.year_columns.len());
    for (col, year) in table.year_columns.iter().enumerate() {
        for row in &table.rows {
            rows.push(RawObservation {
                key: row.key.clone(),
                year: year.clone(),
                value: row.cells.get(col).cloned().unwrap_or_default(),
            });
        }
    }

    log::debug!(
        "melted {} row(s) x {} year column(s) into {} row(s)",
        table.rows.len(),
        table.year_columns.len(),
        rows.len()
    );
    MeltedTable { rows }
}

/// [`split_columns`] followed by [`melt`].
pub fn unpivot(table: &WideTable) -> Result<MeltedTable, ReshapeError> {
    split_columns(table).map(|keyed| melt(&keyed))
}
