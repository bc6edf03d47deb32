//! Column resolution by header alias with content-pattern fallback.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::input::DataTable;
use crate::schema::{CanonicalField, FieldCatalog};

/// Default share of non-empty values that must match a fallback pattern.
pub const DEFAULT_PATTERN_THRESHOLD: f64 = 0.5;

/// How a canonical field was mapped to a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ColumnResolution {
    /// Header matched one of the field's aliases.
    ByName { column: String, index: usize },
    /// Column content matched the field's fallback pattern.
    ByPattern { column: String, index: usize },
    /// No source column; the field is empty in every row.
    Unresolved,
}

impl ColumnResolution {
    /// Source column position, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            ColumnResolution::ByName { index, .. } | ColumnResolution::ByPattern { index, .. } => {
                Some(*index)
            }
            ColumnResolution::Unresolved => None,
        }
    }

    /// Source column name, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            ColumnResolution::ByName { column, .. } | ColumnResolution::ByPattern { column, .. } => {
                Some(column)
            }
            ColumnResolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ColumnResolution::Unresolved)
    }
}

/// First alias present among the table's column names, in alias order.
pub fn resolve_column<S: AsRef<str>>(table: &DataTable, aliases: &[S]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| table.column_index(alias.as_ref()))
}

/// First column, in table order, whose non-empty values match `pattern`
/// at a rate of at least `threshold`.
///
/// A value matches only when a match starts at its first character, whether
/// or not the pattern carries `^`. Columns without any non-empty value are
/// skipped. The first qualifying column wins even if a later one scores higher.
pub fn resolve_column_by_pattern(
    table: &DataTable,
    pattern: &Regex,
    threshold: f64,
) -> Option<usize> {
    (0..table.column_count()).find(|&index| {
        let values: Vec<&str> = table.column_values(index).filter(|v| !v.is_empty()).collect();
        if values.is_empty() {
            return false;
        }
        let matches = values
            .iter()
            .filter(|v| pattern.find(v).is_some_and(|m| m.start() == 0))
            .count();
        matches as f64 / values.len() as f64 >= threshold
    })
}

/// A catalog entry with its fallback pattern compiled.
#[derive(Debug, Clone)]
struct CompiledSpec {
    field: CanonicalField,
    aliases: Vec<String>,
    fallback: Option<Regex>,
}

/// Resolves every catalog field against a table.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    specs: Vec<CompiledSpec>,
    threshold: f64,
}

impl ColumnMatcher {
    /// Compile the catalog's fallback patterns.
    pub fn new(catalog: &FieldCatalog, threshold: f64) -> Result<Self> {
        catalog.validate()?;

        let specs = catalog
            .specs()
            .iter()
            .map(|spec| -> Result<CompiledSpec> {
                let fallback = spec
                    .fallback_pattern
                    .as_deref()
                    .map(Regex::new)
                    .transpose()?;
                Ok(CompiledSpec {
                    field: spec.field,
                    aliases: spec.aliases.clone(),
                    fallback,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { specs, threshold })
    }

    /// Resolve each catalog field, in catalog order.
    ///
    /// A by-name column that is empty in every row gives way to the
    /// fallback pattern when one qualifies.
    pub fn resolve_all(&self, table: &DataTable) -> IndexMap<CanonicalField, ColumnResolution> {
        let mut resolved = IndexMap::with_capacity(self.specs.len());

        for spec in &self.specs {
            let by_name = resolve_column(table, spec.aliases.as_slice());
            let has_data = by_name
                .map(|i| table.column_values(i).any(|v| !v.is_empty()))
                .unwrap_or(false);

            let resolution = if has_data {
                by_name.map(|i| ColumnResolution::ByName {
                    column: table.headers[i].clone(),
                    index: i,
                })
            } else {
                spec.fallback
                    .as_ref()
                    .and_then(|re| resolve_column_by_pattern(table, re, self.threshold))
                    .map(|i| ColumnResolution::ByPattern {
                        column: table.headers[i].clone(),
                        index: i,
                    })
                    .or_else(|| {
                        by_name.map(|i| ColumnResolution::ByName {
                            column: table.headers[i].clone(),
                            index: i,
                        })
                    })
            }
            .unwrap_or(ColumnResolution::Unresolved);

            debug!(field = %spec.field, ?resolution, "resolved column");
            if spec.field == CanonicalField::IdentifierNumber && !resolution.is_resolved() {
                warn!("no identifier column found; document type and gender will be empty");
            }

            resolved.insert(spec.field, resolution);
        }

        resolved
    }
}
