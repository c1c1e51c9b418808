//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use life_expectancy::config::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use life_expectancy::{PipelineConfig, SourceFormat};

#[derive(Parser)]
#[command(
    name = "life-expectancy",
    version,
    about = "Clean a Eurostat life expectancy extract for one region",
    long_about = "Reshape a wide Eurostat life expectancy extract into a long table\n\
                  (unit, sex, age, region, year, value), keep one region and write\n\
                  it to <OUTPUT_DIR>/<region>_life_expectancy.csv."
)]
pub struct Cli {
    /// Region code to keep (e.g. PT, EU27_2020).
    #[arg(long, default_value = "PT")]
    pub region: String,

    /// Source file to clean.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory for the cleaned CSV.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Encoding of the source file.
    #[arg(long, value_enum, default_value_t = SourceFormat::Tsv)]
    pub format: SourceFormat,

    /// Run the pipeline and report counts without writing output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the accepted country codes and exit.
    #[arg(long = "list-regions")]
    pub list_regions: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Errors only.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input: self.input.clone(),
            output_dir: self.output_dir.clone(),
            format: self.format,
            region: self.region.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Default log filter; `RUST_LOG` still takes precedence.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["life-expectancy"]);
        let config = cli.pipeline_config();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "life-expectancy",
            "--region",
            "EU27_2020",
            "--format",
            "json",
            "--input",
            "raw.json",
            "--dry-run",
            "-vv",
        ]);
        let config = cli.pipeline_config();
        assert_eq!(config.region, "EU27_2020");
        assert_eq!(config.format, SourceFormat::Json);
        assert_eq!(config.input, PathBuf::from("raw.json"));
        assert!(config.dry_run);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["life-expectancy", "-v", "-q"]).is_err());
    }
}
