use crate::conf::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that end a replay session.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("unable to read log file {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse first entry")]
    NoFormatDetected,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ReplayError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Why a single line was rejected by a log format.
///
/// These never stop playback: the offending line is logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not match the {format} format")]
    NoMatch { format: &'static str },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("invalid response code '{value}'")]
    InvalidResponseCode { value: String },

    #[error("invalid response size '{value}'")]
    InvalidSize { value: String },

    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("no log format recognised this line")]
    Unrecognised,
}
