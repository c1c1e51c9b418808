use super::model::LongTable;
use super::region::Region;
use crate::error::UnknownRegionError;

// ---------------------------------------------------------------------------
// Region filter
// ---------------------------------------------------------------------------

/// Keep only rows whose `region` equals `region`'s canonical code.
///
/// Comparison is exact and case-sensitive; row order is preserved.
pub fn filter_region(table: LongTable, region: Region) -> LongTable {
    let code = region.code();
    let before = table.len();
    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|row| row.region == code)
        .collect();

    log::debug!("region {code}: kept {} of {before} row(s)", rows.len());
    LongTable { rows }
}

/// Validate `code` against the region enumeration, then filter.
///
/// An unknown code fails before any row is inspected.
pub fn filter_region_code(table: LongTable, code: &str) -> Result<LongTable, UnknownRegionError> {
    let region: Region = code.parse()?;
    Ok(filter_region(table, region))
}
