//! Data layer: table types, loading, reshaping, cleaning and filtering.
//!
//! Architecture:
//! ```text
//!  .tsv                     .json / .parquet
//!    │                            │
//!    ▼                            │
//!   ┌──────────┐                  │
//!   │  loader   │  WideTable       │  MeltedTable
//!   └──────────┘                  │
//!    │                            │
//!    ▼                            │
//!   ┌──────────┐                  │
//!   │ reshape   │  split key, melt │
//!   └──────────┘                  │
//!    │                            │
//!    ▼◄───────────────────────────┘
//!   ┌──────────┐
//!   │  clean    │  strip flags, drop empty, cast → LongTable
//!   └──────────┘
//!    │
//!    ▼
//!   ┌──────────┐
//!   │  filter   │  one region
//!   └──────────┘
//! ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod region;
pub mod reshape;
