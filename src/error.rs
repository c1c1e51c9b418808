//! Error types for the cleaning pipeline.
//!
//! Each stage has its own error; [`PipelineError`] wraps them so a run can be
//! aborted with `?` from any stage.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a source into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source has no header or no data rows.
    #[error("source is empty: {path}")]
    Empty { path: PathBuf },

    /// Source bytes are not valid for the selected format.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Source parsed but does not have the expected columns.
    #[error("unexpected column layout in {path}: {reason}")]
    Layout { path: PathBuf, reason: String },
}

/// A composite key that does not split into exactly four tokens.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row}: composite key '{key}' has {found} token(s), expected 4")]
pub struct ReshapeError {
    pub row: usize,
    pub key: String,
    pub found: usize,
}

/// A cleaned field that could not be converted to its numeric type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("row {row}: year '{value}' is not a positive integer")]
    Year { row: usize, value: String },

    #[error("row {row}: value '{value}' is not a finite number")]
    Value { row: usize, value: String },
}

/// Requested region code is not part of the region enumeration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region code '{code}'")]
pub struct UnknownRegionError {
    pub code: String,
}

/// Failure to persist the cleaned table.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise CSV for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Any error that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Reshape(#[from] ReshapeError),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error(transparent)]
    UnknownRegion(#[from] UnknownRegionError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
