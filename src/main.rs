mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use life_expectancy::{Region, run};

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    if let Err(error) = try_main(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn try_main(cli: &Cli) -> Result<()> {
    if cli.list_regions {
        for region in Region::countries() {
            println!("{}\t{}", region.code(), region.name());
        }
        return Ok(());
    }

    let config = cli.pipeline_config();
    let summary = run(&config)
        .with_context(|| format!("cleaning {} failed", config.input.display()))?;

    match &summary.output_path {
        Some(path) => println!(
            "{}: {} row(s) written to {}",
            summary.region,
            summary.rows_kept,
            path.display()
        ),
        None => println!(
            "{}: {} row(s) (dry run, nothing written)",
            summary.region, summary.rows_kept
        ),
    }
    log::debug!("{summary:?}");
    Ok(())
}
