//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{
    normalize_headers, read_template_columns, DataTable, RawSheet, SheetFile, SourceMetadata,
    TableSource,
};
