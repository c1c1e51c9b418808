//! Reshape Eurostat life expectancy extracts into a per-region long table.
//!
//! ```no_run
//! use life_expectancy::{PipelineConfig, run};
//!
//! let summary = run(&PipelineConfig::default())?;
//! println!("{} row(s) for {}", summary.rows_kept, summary.region);
//! # Ok::<(), life_expectancy::PipelineError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use config::{PipelineConfig, SourceFormat};
pub use data::region::Region;
pub use error::{PipelineError, Result};
pub use pipeline::{RunSummary, clean_data, process, run};
