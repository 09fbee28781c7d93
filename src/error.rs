//! Error types shared across the loading and prompting pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// A filter value that is not part of the accepted vocabulary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid {field} '{value}'")]
    InvalidFilterInput { field: &'static str, value: String },
}

impl FilterError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFilterInput {
            field,
            value: value.into(),
        }
    }
}

/// Failures while reading a city's trip records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no dataset is configured for city '{city}'")]
    DatasetNotFound { city: String },

    #[error("failed to open dataset {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
}

/// Failures while reading a catalog override file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog file {path} defines no cities")]
    Empty { path: PathBuf },
}

/// Failures on the interactive prompt streams.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input closed")]
    InputClosed,

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
