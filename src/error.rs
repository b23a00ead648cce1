//! Error taxonomy for the scanner.
//!
//! Every failure the detection pipeline can report is one variant of
//! [`ScanError`]. File-local variants end up on the file's report; only the
//! binary decides which ones terminate a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, larger than the {max} byte limit")]
    FileSize { path: PathBuf, size: u64, max: u64 },

    #[error("failed to parse {path}: {message}")]
    Parsing { path: PathBuf, message: String },

    #[error("invalid configuration {path}: {message}")]
    Configuration { path: PathBuf, message: String },

    #[error("unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    #[error("feature dataset unavailable: {message}")]
    Dataset { message: String },

    #[error("cannot render report: {message}")]
    Report { message: String },

    #[error("invalid mapping pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ScanError {
    /// Short tag used by reports ("file-size", "parsing", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::FileSystem { .. } => "file-system",
            ScanError::FileSize { .. } => "file-size",
            ScanError::Parsing { .. } => "parsing",
            ScanError::Configuration { .. } => "configuration",
            ScanError::UnsupportedFile { .. } => "unsupported-file",
            ScanError::Dataset { .. } => "dataset",
            ScanError::Report { .. } => "report",
            ScanError::InvalidPattern { .. } => "invalid-pattern",
        }
    }
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;
