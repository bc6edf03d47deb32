//! Tabular file reader for workbooks and delimited text.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{RawSheet, SourceMetadata};
use crate::error::{Result, SplitError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions opened as spreadsheet workbooks.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character for text files.
    pub quote: u8,
    /// Worksheet to read from a workbook (None = first sheet).
    pub sheet: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            sheet: None,
        }
    }
}

/// Reads tabular files into untyped string rows.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read a file into raw rows and describe it.
    #[tracing::instrument(level = "info", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawSheet, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| SplitError::io(path, e))?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let (sheet, format) = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            (self.parse_workbook(path)?, extension)
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(&contents)?,
            };
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            }
            .to_string();
            (self.parse_bytes(&contents, delimiter)?, format)
        };

        if sheet.is_empty() {
            return Err(SplitError::EmptyData(format!(
                "No rows found in {}",
                path.display()
            )));
        }

        debug!(rows = sheet.len(), width = sheet.width(), %format, "read raw sheet");

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            sheet.len(),
            sheet.width(),
        );

        Ok((sheet, metadata))
    }

    /// Read the configured worksheet of a workbook.
    fn parse_workbook(&self, path: &Path) -> Result<RawSheet> {
        let workbook_error = |message: String| SplitError::Workbook {
            path: path.to_path_buf(),
            message,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

        let range = match &self.config.sheet {
            Some(name) => workbook
                .worksheet_range(name)
                .map_err(|e| workbook_error(e.to_string()))?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| workbook_error("workbook has no worksheets".to_string()))?
                .map_err(|e| workbook_error(e.to_string()))?,
        };

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(RawSheet::new(rows))
    }

    /// Parse delimited bytes directly.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RawSheet> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(RawSheet::new(rows))
    }
}

/// Render a workbook cell as text without numeric reinterpretation.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
    }
}

/// Integral floats print without a fractional part so phone numbers stay intact.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SplitError::EmptyData("No lines to analyze".to_string()));
    }

    // Decorative title rows carry no delimiters, so score on the lines that do.
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .filter(|&c| c > 0)
            .collect();

        if counts.is_empty() {
            continue;
        }

        let first_count = counts[0];
        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a small bonus
        let score = if consistent {
            counts.len() * 1000 + first_count * 10 + (if delim == b'\t' { 5 } else { 0 })
        } else if variance < 1.0 {
            counts.len() * 100 + first_count
        } else {
            counts.len()
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
