//! Error types for the rostersplit library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rostersplit operations.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening or decoding a spreadsheet workbook.
    #[error("Workbook error for '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// Error writing an XLSX workbook.
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Error moving a finished temporary file into place.
    #[error("Failed to persist output: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no rows to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for rostersplit operations.
pub type Result<T> = std::result::Result<T, SplitError>;
