//! End-to-end run: load → split → melt → normalise → cast → filter → write.
//!
//! Every stage takes a table and returns a new one. Output is written only
//! after all stages succeed, so a failed run produces nothing.

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::data::clean::{cast_types, normalize};
use crate::data::filter::filter_region;
use crate::data::loader::load_data;
use crate::data::model::{LongTable, MeltedTable, SourceTable};
use crate::data::region::Region;
use crate::data::reshape::unpivot;
use crate::error::Result;
use crate::writer::save_data;

/// Row counts and output location of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub region: Region,
    /// Rows as loaded (wide rows for TSV, records otherwise).
    pub rows_loaded: usize,
    /// Long rows before normalisation.
    pub rows_melted: usize,
    /// Rows surviving normalisation, before the region filter.
    pub rows_cleaned: usize,
    /// Rows in the final table.
    pub rows_kept: usize,
    /// `None` for dry runs.
    pub output_path: Option<PathBuf>,
}

/// Bring any source table to long format with text fields.
pub fn to_long(table: &SourceTable) -> Result<MeltedTable> {
    match table {
        SourceTable::Wide(wide) => Ok(unpivot(wide)?),
        SourceTable::Long(long) => Ok(long.clone()),
    }
}

/// Split, melt, normalise and cast, without region filtering.
pub fn clean_data(table: &SourceTable) -> Result<LongTable> {
    let melted = to_long(table)?;
    Ok(cast_types(normalize(melted))?)
}

/// Full clean and region filter.
///
/// The region is validated first: an unknown code fails before any
/// transformation runs.
pub fn process(table: &SourceTable, region: &str) -> Result<LongTable> {
    let region: Region = region.parse()?;
    Ok(filter_region(clean_data(table)?, region))
}

/// Execute one run described by `config`.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let region: Region = config.region.parse()?;
    log::info!(
        "cleaning {} ({}) for region {region}",
        config.input.display(),
        config.format
    );

    let source = load_data(&config.input, config.format)?;
    let rows_loaded = source.len();

    let melted = to_long(&source)?;
    drop(source);
    let rows_melted = melted.len();

    let cleaned = cast_types(normalize(melted))?;
    let rows_cleaned = cleaned.len();

    let filtered = filter_region(cleaned, region);
    let rows_kept = filtered.len();
    if filtered.is_empty() {
        log::warn!("no rows for region {region} in {}", config.input.display());
    }

    let output_path = if config.dry_run {
        log::info!("dry run: {rows_kept} row(s) not written");
        None
    } else {
        Some(save_data(&filtered, region, &config.output_dir)?)
    };

    Ok(RunSummary {
        region,
        rows_loaded,
        rows_melted,
        rows_cleaned,
        rows_kept,
        output_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::TsvLoader;
    use crate::error::PipelineError;
    use std::path::Path;

    const RAW: &str = "unit,sex,age,geo\\time\t2019 \t2020 \n\
                       Y,F,Y10,PT\t72.3 e\t: \n\
                       Y,M,Y10,AT\t70.1 \t70.5 p\n";

    fn source(text: &str) -> SourceTable {
        SourceTable::Wide(TsvLoader.read_from(text.as_bytes(), Path::new("inline")).unwrap())
    }

    #[test]
    fn test_single_row_scenario() {
        let table = process(&source(RAW), "PT").unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(
            (row.unit.as_str(), row.sex.as_str(), row.age.as_str(), row.region.as_str()),
            ("Y", "F", "Y10", "PT")
        );
        assert_eq!(row.year, 2019);
        assert_eq!(row.value, 72.3);
    }

    #[test]
    fn test_clean_data_keeps_all_regions() {
        let table = clean_data(&source(RAW)).unwrap();
        let years: Vec<(&str, u32)> = table
            .rows
            .iter()
            .map(|r| (r.region.as_str(), r.year))
            .collect();
        assert_eq!(years, vec![("PT", 2019), ("AT", 2019), ("AT", 2020)]);
    }

    #[test]
    fn test_unknown_region() {
        let err = process(&source(RAW), "ZZ").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownRegion(_)));
    }

    #[test]
    fn test_malformed_key_is_reshape_error() {
        let raw = "unit,sex,age,geo\\time\t2019 \nY,F,PT\t72.3 e\n";
        let err = process(&source(raw), "PT").unwrap_err();
        assert!(matches!(err, PipelineError::Reshape(_)));
    }

    #[test]
    fn test_row_counts_never_increase() {
        let melted = to_long(&source(RAW)).unwrap();
        let cleaned = normalize(melted.clone());
        let filtered = filter_region(cast_types(cleaned.clone()).unwrap(), Region::Austria);
        assert_eq!(melted.len(), 2 * 2);
        assert!(cleaned.len() <= melted.len());
        assert!(filtered.len() <= cleaned.len());
    }
}
