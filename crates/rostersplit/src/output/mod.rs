//! Writing result tables.

mod writer;

pub use writer::{DelimitedSink, OutputFormat, TableSink, XlsxSink};
