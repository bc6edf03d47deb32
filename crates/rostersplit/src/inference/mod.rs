//! Inference engine: header location, column resolution and identifier classification.

mod header;
mod identifier;
mod matcher;

pub use header::{locate_header_row, HeaderConfig, HeaderLocator};
pub use identifier::{classify_document_type, classify_gender};
pub use matcher::{
    resolve_column, resolve_column_by_pattern, ColumnMatcher, ColumnResolution,
    DEFAULT_PATTERN_THRESHOLD,
};
