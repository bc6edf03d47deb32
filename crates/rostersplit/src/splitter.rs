//! Main Splitter struct and public API.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SplitError};
use crate::inference::{
    ColumnMatcher, ColumnResolution, HeaderConfig, HeaderLocator, DEFAULT_PATTERN_THRESHOLD,
};
use crate::input::{
    read_template_columns, DataTable, Parser, ParserConfig, SheetFile, SourceMetadata,
};
use crate::output::OutputFormat;
use crate::schema::{CanonicalField, CanonicalTable, FieldCatalog, Gender, Locale};
use crate::transform::{
    default_column_order, partition_by_gender, reorder, Extraction, Extractor, UnresolvedPolicy,
};

/// Configuration for a split run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Header detection settings.
    pub header: HeaderConfig,
    /// Field aliases and fallback patterns.
    pub catalog: FieldCatalog,
    /// Share of non-empty values a fallback pattern must match.
    pub pattern_threshold: f64,
    /// Language of output headers and derived values.
    pub locale: Locale,
    /// Handling of records whose gender cannot be derived.
    pub unresolved: UnresolvedPolicy,
    /// Output columns used when no template file is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,
    /// Worksheet to read from workbook sources (None = first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            header: HeaderConfig::default(),
            catalog: FieldCatalog::default(),
            pattern_threshold: DEFAULT_PATTERN_THRESHOLD,
            locale: Locale::default(),
            unresolved: UnresolvedPolicy::default(),
            column_order: None,
            sheet: None,
        }
    }
}

impl SplitterConfig {
    /// Load a configuration from a JSON file. Missing sections take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
        let config: SplitterConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !(self.pattern_threshold > 0.0 && self.pattern_threshold <= 1.0) {
            return Err(SplitError::Config(format!(
                "pattern_threshold must be in (0, 1], got {}",
                self.pattern_threshold
            )));
        }
        if self.header.max_scan == 0 {
            return Err(SplitError::Config("header.max_scan must be at least 1".to_string()));
        }
        if self.column_order.as_ref().is_some_and(|o| o.is_empty()) {
            return Err(SplitError::Config("column_order must not be empty".to_string()));
        }
        self.catalog.validate()
    }
}

/// Where the output column order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrderSource {
    Template,
    Configured,
    Default,
}

/// Counts describing a split run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Records extracted from the source.
    pub total_records: usize,
    pub male: usize,
    pub female: usize,
    /// Records whose identifier yields no gender.
    pub unresolved_gender: usize,
    /// Records per document type label; unknown types are not listed.
    pub by_document_type: IndexMap<String, usize>,
    /// Records whose identifier matches no document type.
    pub unknown_document_type: usize,
}

impl SplitSummary {
    fn from_table(table: &CanonicalTable, locale: Locale) -> Self {
        let mut summary = SplitSummary {
            total_records: table.len(),
            ..Default::default()
        };

        for record in &table.records {
            match record.gender {
                Some(Gender::Male) => summary.male += 1,
                Some(Gender::Female) => summary.female += 1,
                None => summary.unresolved_gender += 1,
            }
            match record.document_type {
                Some(doc) => {
                    *summary
                        .by_document_type
                        .entry(doc.label(locale).to_string())
                        .or_insert(0) += 1
                }
                None => summary.unknown_document_type += 1,
            }
        }

        summary
    }
}

/// Result of splitting a source file.
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Raw row used as the header.
    pub header_row: usize,
    /// Source column chosen for each catalog field.
    pub resolutions: IndexMap<CanonicalField, ColumnResolution>,
    /// Pre-existing derived columns that were ignored.
    pub dropped_columns: Vec<String>,
    /// Output columns, in order.
    pub column_order: Vec<String>,
    pub column_order_source: ColumnOrderSource,
    #[serde(skip)]
    pub male: DataTable,
    #[serde(skip)]
    pub female: DataTable,
    /// Present under [`UnresolvedPolicy::Separate`].
    #[serde(skip)]
    pub unresolved: Option<DataTable>,
    pub summary: SplitSummary,
}

/// Files written by [`SplitResult::write`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub male: PathBuf,
    pub female: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<PathBuf>,
}

impl SplitResult {
    /// Write the output tables into `dir`, creating it if needed.
    ///
    /// Files are named `{prefix}male`, `{prefix}female` and, when present,
    /// `{prefix}unresolved`, with the format's extension.
    pub fn write(&self, dir: impl AsRef<Path>, format: OutputFormat, prefix: &str) -> Result<OutputPaths> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;

        let sink = format.sink();
        let path_for = |stem: &str| dir.join(format!("{}{}.{}", prefix, stem, sink.extension()));

        let male = path_for("male");
        sink.write_table(&self.male, &male)?;

        let female = path_for("female");
        sink.write_table(&self.female, &female)?;

        let unresolved = match &self.unresolved {
            Some(table) => {
                let path = path_for("unresolved");
                sink.write_table(table, &path)?;
                Some(path)
            }
            None => None,
        };

        info!(dir = %dir.display(), "wrote split outputs");
        Ok(OutputPaths {
            male,
            female,
            unresolved,
        })
    }
}

/// The roster extraction and split pipeline.
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitterConfig,
    parser: Parser,
    extractor: Extractor,
}

impl Splitter {
    /// Create a splitter with default configuration.
    pub fn new() -> Self {
        Self::with_config(SplitterConfig::default())
            .expect("built-in configuration compiles")
    }

    /// Create a splitter with custom configuration.
    pub fn with_config(config: SplitterConfig) -> Result<Self> {
        config.validate()?;

        let parser = Parser::with_config(ParserConfig {
            sheet: config.sheet.clone(),
            ..ParserConfig::default()
        });
        let extractor = Extractor::new(
            HeaderLocator::with_config(config.header.clone()),
            ColumnMatcher::new(&config.catalog, config.pattern_threshold)?,
        );

        Ok(Self {
            config,
            parser,
            extractor,
        })
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Read a source file and normalize it to canonical records.
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<Extraction> {
        self.extractor
            .extract(&SheetFile::with_parser(path.as_ref(), self.parser.clone()))
    }

    /// Extract a source file and split it by gender.
    ///
    /// Output columns follow the template's header row when given, else the
    /// configured order, else the default order.
    pub fn split(&self, path: impl AsRef<Path>, template: Option<&Path>) -> Result<SplitResult> {
        let path = path.as_ref();
        let locale = self.config.locale;

        let (sheet, source) = self.parser.parse_file(path)?;
        let extraction = self.extractor.extract_raw(&sheet);

        let (column_order, column_order_source) = match template {
            Some(template) => (
                read_template_columns(&SheetFile::new(template))?,
                ColumnOrderSource::Template,
            ),
            None => match &self.config.column_order {
                Some(order) => (order.clone(), ColumnOrderSource::Configured),
                None => (default_column_order(locale), ColumnOrderSource::Default),
            },
        };

        let unknown: Vec<&str> = column_order
            .iter()
            .filter(|c| CanonicalField::from_header(c, locale).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            warn!(?unknown, "output columns with no canonical field will be empty");
        }

        let summary = SplitSummary::from_table(&extraction.table, locale);
        let partition = partition_by_gender(&extraction.table, self.config.unresolved);

        info!(
            file = %source.file,
            records = summary.total_records,
            male = summary.male,
            female = summary.female,
            unresolved = summary.unresolved_gender,
            "split complete"
        );

        Ok(SplitResult {
            source,
            header_row: extraction.header_row,
            resolutions: extraction.resolutions,
            dropped_columns: extraction.dropped_columns,
            male: reorder(&partition.male, &column_order, locale),
            female: reorder(&partition.female, &column_order, locale),
            unresolved: partition
                .unresolved
                .as_ref()
                .map(|t| reorder(t, &column_order, locale)),
            column_order,
            column_order_source,
            summary,
        })
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_split_simple_csv() {
        let content = "姓名,证件号,手机号\n张三,110101199003077758,13800138000\n李四,110101199003071728,13900139000\nX,abc,\n";
        let file = create_test_file(content, ".csv");

        let result = Splitter::new().split(file.path(), None).unwrap();

        assert_eq!(result.summary.total_records, 3);
        assert_eq!(result.summary.male, 1);
        assert_eq!(result.summary.female, 1);
        assert_eq!(result.summary.unresolved_gender, 1);
        assert_eq!(result.summary.by_document_type["身份证"], 2);
        assert_eq!(result.summary.unknown_document_type, 1);
        assert_eq!(result.column_order_source, ColumnOrderSource::Default);
        assert_eq!(result.male.rows[0][0], "张三");
        assert_eq!(result.male.rows[0][1], "身份证");
        assert!(result.unresolved.is_none());
    }

    #[test]
    fn test_configured_column_order() {
        let content = "Name,IdentifierNumber\nZhang,110101199003077758\n";
        let file = create_test_file(content, ".csv");

        let config = SplitterConfig {
            locale: Locale::English,
            column_order: Some(vec!["Gender".to_string(), "Name".to_string()]),
            ..Default::default()
        };
        let result = Splitter::with_config(config)
            .unwrap()
            .split(file.path(), None)
            .unwrap();

        assert_eq!(result.column_order_source, ColumnOrderSource::Configured);
        assert_eq!(result.male.rows, vec![vec!["Male", "Zhang"]]);
        assert_eq!(result.female.row_count(), 0);
    }

    #[test]
    fn test_config_validation() {
        let bad_threshold = SplitterConfig {
            pattern_threshold: 0.0,
            ..Default::default()
        };
        assert!(Splitter::with_config(bad_threshold).is_err());

        let bad_scan = SplitterConfig {
            header: HeaderConfig {
                max_scan: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(bad_scan.validate().is_err());
    }

    #[test]
    fn test_load_partial_config() {
        let file = create_test_file(r#"{"locale": "en", "unresolved": "separate"}"#, ".json");
        let config = SplitterConfig::load(file.path()).unwrap();

        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.unresolved, UnresolvedPolicy::Separate);
        assert_eq!(config.header, HeaderConfig::default());
        assert_eq!(config.catalog, FieldCatalog::full());
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let result = Splitter::new().split("/nonexistent/roster.xlsx", None);
        assert!(matches!(result, Err(SplitError::Io { .. })));
    }
}
