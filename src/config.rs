//! Run configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;

use crate::data::region::Region;

/// Default raw extract, relative to the working directory.
pub const DEFAULT_INPUT: &str = "data/eu_life_expectancy_raw.tsv";
/// Default directory for cleaned output.
pub const DEFAULT_OUTPUT_DIR: &str = "data";
/// Suffix appended to the lower-cased region code to name the output file.
pub const OUTPUT_SUFFIX: &str = "_life_expectancy.csv";

/// Encoding of the source file. Chosen explicitly, never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceFormat {
    /// Tab-delimited wide extract with a composite key column.
    #[default]
    Tsv,
    /// JSON array of long-format records.
    Json,
    /// Parquet file of long-format records.
    Parquet,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Tsv => "tsv",
            SourceFormat::Json => "json",
            SourceFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsv" => Ok(SourceFormat::Tsv),
            "json" => Ok(SourceFormat::Json),
            "parquet" | "pq" => Ok(SourceFormat::Parquet),
            other => Err(format!("unsupported source format: {other}")),
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub format: SourceFormat,
    /// Requested region code. Validated when the run reaches the region filter.
    pub region: String,
    /// Run every stage but skip writing output.
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: SourceFormat::default(),
            region: Region::default().code().to_string(),
            dry_run: false,
        }
    }
}

impl PipelineConfig {
    /// Output file for `region` under `output_dir`.
    pub fn output_path(&self, region: Region) -> PathBuf {
        output_path(&self.output_dir, region)
    }
}

/// `<dir>/<region lower>_life_expectancy.csv`
pub fn output_path(dir: &Path, region: Region) -> PathBuf {
    dir.join(format!("{}{OUTPUT_SUFFIX}", region.file_stem()))
}
