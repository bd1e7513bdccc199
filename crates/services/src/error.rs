//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use revise_core::model::{ListError, QuestionError, UnknownAttribute};
use revise_core::ScoringError;
use storage::StorageError;

/// Errors emitted while locating or reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Errors emitted when parsing a run type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunTypeError {
    #[error("\"{0}\" is not a run type (expected revise, test or custom)")]
    Unknown(String),
}

/// Errors emitted while building a question filter.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FilterError {
    #[error("filter \"{0}\" must look like attribute=value1,value2")]
    Malformed(String),
    #[error(transparent)]
    Attribute(#[from] UnknownAttribute),
    #[error(transparent)]
    Value(#[from] QuestionError),
    #[error("range \"{0}\" must look like attribute=min..max")]
    MalformedRange(String),
    #[error("range bound \"{0}\" is not a number")]
    Bound(String),
    #[error("range minimum {min} is greater than maximum {max}")]
    Inverted { min: f64, max: f64 },
}

/// Errors emitted by revision sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
