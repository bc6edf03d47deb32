//! Data source abstraction and metadata.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use super::parser::Parser;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, csv, tsv, etc.).
    pub format: String,
    /// Number of raw rows, header and preamble included.
    pub row_count: usize,
    /// Widest row in cells.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }
}

/// Every row of a sheet as strings, with no header interpretation.
///
/// Missing cells are empty strings. Leading rows may be decorative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Re-interpret the rows with `header_row` as the column names.
    ///
    /// Rows above the header are discarded. With `None`, columns are named
    /// `column_1..n` and every row is data.
    pub fn with_header(&self, header_row: Option<usize>) -> DataTable {
        let width = self.width();

        let (headers, data_start) = match header_row {
            Some(index) => {
                let cells = self.rows.get(index).map(Vec::as_slice).unwrap_or(&[]);
                (normalize_headers(cells, width), index + 1)
            }
            None => ((0..width).map(|i| format!("column_{}", i + 1)).collect(), 0),
        };

        let rows = self
            .rows
            .iter()
            .skip(data_start)
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect();

        DataTable::new(headers, rows)
    }
}

/// Turn header cells into unique column names.
///
/// Blank cells become `Unnamed: {index}` and repeated names get a `.N`
/// suffix in order of appearance.
pub fn normalize_headers(cells: &[String], width: usize) -> Vec<String> {
    let width = width.max(cells.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(width);
    let mut headers = Vec::with_capacity(width);

    for index in 0..width {
        let cell = cells.get(index).map(String::as_str).unwrap_or("");
        let base = if cell.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            cell.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

/// Represents tabular data with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Remove every column whose name satisfies `drop`, returning the removed names.
    pub fn drop_columns(&mut self, drop: impl Fn(&str) -> bool) -> Vec<String> {
        let keep: Vec<bool> = self.headers.iter().map(|h| !drop(h)).collect();
        if keep.iter().all(|k| *k) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut headers = Vec::with_capacity(self.headers.len());
        for (header, keep) in self.headers.drain(..).zip(&keep) {
            if *keep {
                headers.push(header);
            } else {
                removed.push(header);
            }
        }
        self.headers = headers;

        for row in &mut self.rows {
            let mut position = 0;
            row.retain(|_| {
                let retained = keep.get(position).copied().unwrap_or(true);
                position += 1;
                retained
            });
        }

        removed
    }

    /// Project onto `order`: named columns are copied, unknown names become
    /// all-empty columns, and anything not named is dropped.
    pub fn reorder(&self, order: &[String]) -> DataTable {
        let sources: Vec<Option<usize>> = order.iter().map(|name| self.column_index(name)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                sources
                    .iter()
                    .map(|source| {
                        source
                            .and_then(|i| row.get(i))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        DataTable::new(order.to_vec(), rows)
    }
}

/// Something that can supply the rows of a tabular file.
pub trait TableSource {
    /// Short description for logs and errors.
    fn describe(&self) -> String;

    /// Read every row as strings without assuming a header.
    fn read_raw(&self) -> Result<RawSheet>;

    /// Read rows with `header_row` interpreted as column names.
    fn read_table(&self, header_row: Option<usize>) -> Result<DataTable> {
        Ok(self.read_raw()?.with_header(header_row))
    }
}

impl TableSource for RawSheet {
    fn describe(&self) -> String {
        format!("in-memory sheet ({} rows)", self.rows.len())
    }

    fn read_raw(&self) -> Result<RawSheet> {
        Ok(self.clone())
    }
}

/// A spreadsheet or delimited text file on disk.
#[derive(Debug, Clone)]
pub struct SheetFile {
    path: PathBuf,
    parser: Parser,
}

impl SheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_parser(path, Parser::new())
    }

    pub fn with_parser(path: impl Into<PathBuf>, parser: Parser) -> Self {
        Self {
            path: path.into(),
            parser,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for SheetFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_raw(&self) -> Result<RawSheet> {
        let (sheet, _) = self.parser.parse_file(&self.path)?;
        Ok(sheet)
    }
}

/// Column names from row 0 of a template, in order.
pub fn read_template_columns(source: &dyn TableSource) -> Result<Vec<String>> {
    Ok(source.read_table(Some(0))?.headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: Vec<Vec<&str>>) -> RawSheet {
        RawSheet::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_with_header_skips_preamble() {
        let raw = sheet(vec![
            vec!["2024 roster"],
            vec!["姓名", "证件号"],
            vec!["张三", "110101199003077758"],
        ]);
        let table = raw.with_header(Some(1));

        assert_eq!(table.headers, vec!["姓名", "证件号"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, 1), Some("110101199003077758"));
    }

    #[test]
    fn test_with_header_none_generates_names() {
        let raw = sheet(vec![vec!["a", "b"], vec!["c"]]);
        let table = raw.with_header(None);

        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 1), Some(""));
    }

    #[test]
    fn test_normalize_headers() {
        let cells: Vec<String> = ["姓名", "", "电话", "电话", "电话"]
            .into_iter()
            .map(String::from)
            .collect();
        let headers = normalize_headers(&cells, 6);

        assert_eq!(
            headers,
            vec!["姓名", "Unnamed: 1", "电话", "电话.1", "电话.2", "Unnamed: 5"]
        );
    }

    #[test]
    fn test_drop_columns() {
        let mut table = sheet(vec![
            vec!["姓名", "性别", "证件号"],
            vec!["张三", "女", "1"],
        ])
        .with_header(Some(0));

        let removed = table.drop_columns(|h| h.trim() == "性别");

        assert_eq!(removed, vec!["性别"]);
        assert_eq!(table.headers, vec!["姓名", "证件号"]);
        assert_eq!(table.rows[0], vec!["张三", "1"]);
    }

    #[test]
    fn test_reorder_pads_and_drops() {
        let table = sheet(vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]).with_header(Some(0));
        let order = vec!["b".to_string(), "missing".to_string()];
        let reordered = table.reorder(&order);

        assert_eq!(reordered.headers, order);
        assert_eq!(reordered.rows, vec![vec!["2", ""], vec!["4", ""]]);
    }

    #[test]
    fn test_template_columns_from_memory() {
        let raw = sheet(vec![vec!["体检卡号", "姓名"], vec!["x", "y"]]);
        let columns = read_template_columns(&raw).unwrap();
        assert_eq!(columns, vec!["体检卡号", "姓名"]);
    }
}
