//! Rostersplit: normalize personnel rosters and split them by gender.
//!
//! A roster is a spreadsheet or delimited text file with one person per row.
//! Rostersplit finds the real header row below any title rows, maps the
//! source's columns onto a fixed set of canonical fields, derives document
//! type and gender from each identifier number, and writes one table per
//! gender.
//!
//! # Pipeline
//!
//! - **Header location**: the first of the top rows that mentions a known keyword
//! - **Column resolution**: alias lookup by name, then value-pattern fallback
//! - **Classification**: document type and gender from the identifier alone
//! - **Split**: male and female tables in template, configured or default column order
//!
//! # Example
//!
//! ```no_run
//! use rostersplit::{OutputFormat, Splitter};
//!
//! let splitter = Splitter::new();
//! let result = splitter.split("roster.xlsx", None).unwrap();
//!
//! println!("Male: {}", result.summary.male);
//! println!("Female: {}", result.summary.female);
//!
//! result.write("out", OutputFormat::Xlsx, "").unwrap();
//! ```

pub mod error;
pub mod inference;
pub mod input;
pub mod output;
pub mod schema;
pub mod transform;

mod splitter;

pub use crate::splitter::{
    ColumnOrderSource, OutputPaths, SplitResult, SplitSummary, Splitter, SplitterConfig,
};
pub use error::{Result, SplitError};
pub use inference::{classify_document_type, classify_gender, ColumnResolution};
pub use input::{DataTable, SourceMetadata};
pub use output::OutputFormat;
pub use schema::{CanonicalField, CanonicalRecord, CanonicalTable, DocumentType, Gender, Locale};
pub use transform::{Extraction, UnresolvedPolicy};
