//! Table sinks for XLSX and delimited text.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, SplitError};
use crate::input::DataTable;

/// Largest row and column indices an XLSX worksheet accepts.
const XLSX_MAX_ROW: usize = 1_048_575;
const XLSX_MAX_COL: usize = 16_383;

/// Something that can write a string table to a file.
pub trait TableSink {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Write the table's header and rows to `out`.
    fn write_to(&self, table: &DataTable, out: &mut File) -> Result<()>;

    /// Write to `path`, replacing it only once the file is complete.
    fn write_table(&self, table: &DataTable, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SplitError::io(dir, e))?;
        self.write_to(table, tmp.as_file_mut())?;
        tmp.persist(path)?;

        debug!(path = %path.display(), rows = table.row_count(), "wrote table");
        Ok(())
    }
}

/// Writes a single-sheet workbook with every cell stored as text.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    sheet_name: String,
}

impl XlsxSink {
    pub fn new() -> Self {
        Self::with_sheet_name("Sheet1")
    }

    pub fn with_sheet_name(name: impl Into<String>) -> Self {
        Self {
            sheet_name: name.into(),
        }
    }
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for XlsxSink {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write_to(&self, table: &DataTable, out: &mut File) -> Result<()> {
        if table.row_count() > XLSX_MAX_ROW || table.column_count() > XLSX_MAX_COL + 1 {
            return Err(SplitError::UnsupportedFormat(format!(
                "{} rows x {} columns exceeds XLSX worksheet limits",
                table.row_count(),
                table.column_count()
            )));
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet.write_string(row_idx as u32 + 1, col as u16, value)?;
            }
        }

        workbook.save_to_writer(out)?;
        Ok(())
    }
}

/// Writes CSV or TSV.
#[derive(Debug, Clone)]
pub struct DelimitedSink {
    delimiter: u8,
}

impl DelimitedSink {
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl TableSink for DelimitedSink {
    fn extension(&self) -> &'static str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }

    fn write_to(&self, table: &DataTable, out: &mut File) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(&mut *out);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| SplitError::io("<output>", e))?;
        drop(writer);

        out.flush().map_err(|e| SplitError::io("<output>", e))?;
        Ok(())
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Tsv,
}

impl OutputFormat {
    pub fn sink(&self) -> Box<dyn TableSink> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxSink::new()),
            OutputFormat::Csv => Box::new(DelimitedSink::csv()),
            OutputFormat::Tsv => Box::new(DelimitedSink::tsv()),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
        }
    }
}
