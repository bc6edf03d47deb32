//! Raw sheet to canonical table.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::inference::{
    classify_document_type, classify_gender, ColumnMatcher, ColumnResolution, HeaderLocator,
};
use crate::input::{DataTable, RawSheet, TableSource};
use crate::schema::{CanonicalField, CanonicalRecord, CanonicalTable, Locale};

/// Outcome of extracting one source.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Zero-based raw row used as the header.
    pub header_row: usize,
    /// Source column chosen for each catalog field, in catalog order.
    pub resolutions: IndexMap<CanonicalField, ColumnResolution>,
    /// Pre-existing derived columns discarded before resolution.
    pub dropped_columns: Vec<String>,
    /// One record per data row below the header.
    pub table: CanonicalTable,
}

/// Locates the header, resolves columns and classifies identifiers.
#[derive(Debug, Clone)]
pub struct Extractor {
    locator: HeaderLocator,
    matcher: ColumnMatcher,
}

impl Extractor {
    pub fn new(locator: HeaderLocator, matcher: ColumnMatcher) -> Self {
        Self { locator, matcher }
    }

    /// Read a source and extract it.
    pub fn extract(&self, source: &dyn TableSource) -> Result<Extraction> {
        let sheet = source.read_raw()?;
        let extraction = self.extract_raw(&sheet);

        info!(
            source = %source.describe(),
            header_row = extraction.header_row,
            records = extraction.table.len(),
            "extracted canonical table"
        );

        Ok(extraction)
    }

    /// Extract an already-read sheet.
    pub fn extract_raw(&self, sheet: &RawSheet) -> Extraction {
        let header_row = self.locator.locate(sheet);
        let mut table = sheet.with_header(Some(header_row));

        // Gender and document type are always recomputed from the identifier
        let dropped_columns = table.drop_columns(is_derived_header);
        if !dropped_columns.is_empty() {
            debug!(?dropped_columns, "discarded pre-existing derived columns");
        }

        let resolutions = self.matcher.resolve_all(&table);
        let records = build_records(&table, &resolutions);

        Extraction {
            header_row,
            resolutions,
            dropped_columns,
            table: CanonicalTable::new(records),
        }
    }
}

fn is_derived_header(header: &str) -> bool {
    let header = header.trim();
    [Locale::Chinese, Locale::English].into_iter().any(|locale| {
        CanonicalField::ALL
            .iter()
            .filter(|f| f.is_derived())
            .any(|f| f.header(locale) == header)
    })
}

fn build_records(
    table: &DataTable,
    resolutions: &IndexMap<CanonicalField, ColumnResolution>,
) -> Vec<CanonicalRecord> {
    (0..table.row_count())
        .map(|row| {
            let mut record = CanonicalRecord::default();

            for (field, resolution) in resolutions {
                let Some(col) = resolution.index() else {
                    continue;
                };
                if let Some(slot) = record.slot_mut(*field) {
                    *slot = table.get(row, col).unwrap_or("").to_string();
                }
            }

            record.document_type = classify_document_type(&record.identifier_number);
            record.gender = classify_gender(&record.identifier_number);
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::DEFAULT_PATTERN_THRESHOLD;
    use crate::schema::{DocumentType, FieldCatalog, Gender};

    fn extractor() -> Extractor {
        Extractor::new(
            HeaderLocator::new(),
            ColumnMatcher::new(&FieldCatalog::full(), DEFAULT_PATTERN_THRESHOLD).unwrap(),
        )
    }

    fn sheet(rows: Vec<Vec<&str>>) -> RawSheet {
        RawSheet::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_extract_preserves_row_count_and_order() {
        let raw = sheet(vec![
            vec!["员工体检名单"],
            vec!["姓名", "身份证号码", "电话", "部门"],
            vec!["张三", "110101199003077758", "13800138000", "财务部"],
            vec!["", "", "", ""],
            vec!["李四", "110101199003071728", "13900139000", "人事部"],
        ]);
        let extraction = extractor().extract_raw(&raw);

        assert_eq!(extraction.header_row, 1);
        assert_eq!(extraction.table.len(), 3);

        let records = &extraction.table.records;
        assert_eq!(records[0].name, "张三");
        assert_eq!(records[0].organization_unit, "财务部");
        assert_eq!(records[0].gender, Some(Gender::Male));
        assert_eq!(records[0].document_type, Some(DocumentType::NationalId));
        assert_eq!(records[1], CanonicalRecord::default());
        assert_eq!(records[2].phone_number, "13900139000");
        assert_eq!(records[2].gender, Some(Gender::Female));
    }

    #[test]
    fn test_existing_gender_column_is_ignored() {
        let raw = sheet(vec![
            vec!["姓名", " 性别 ", "证件号"],
            vec!["张三", "女", "110101199003077758"],
        ]);
        let extraction = extractor().extract_raw(&raw);

        assert_eq!(extraction.dropped_columns, vec![" 性别 "]);
        assert_eq!(extraction.table.records[0].gender, Some(Gender::Male));
    }

    #[test]
    fn test_pattern_fallback_without_headers() {
        let raw = sheet(vec![
            vec!["a", "b", "c"],
            vec!["张三", "13800138000", "110101199003077758"],
            vec!["李四", "13900139000", "110101199003071728"],
        ]);
        let extraction = extractor().extract_raw(&raw);

        assert_eq!(extraction.header_row, 0);
        let record = &extraction.table.records[1];
        assert_eq!(record.name, "李四");
        assert_eq!(record.phone_number, "13900139000");
        assert_eq!(record.identifier_number, "110101199003071728");
        assert!(matches!(
            extraction.resolutions[&CanonicalField::Name],
            ColumnResolution::ByPattern { .. }
        ));
    }

    #[test]
    fn test_missing_identifier_leaves_derived_fields_empty() {
        let raw = sheet(vec![vec!["姓名"], vec!["张三"]]);
        let extraction = extractor().extract_raw(&raw);

        let record = &extraction.table.records[0];
        assert_eq!(record.document_type, None);
        assert_eq!(record.gender, None);
        assert_eq!(record.identifier_number, "");
    }

    #[test]
    fn test_extract_from_source_trait() {
        let raw = sheet(vec![vec!["Name", "IdentifierNumber"], vec!["Zhang", "H1234567"]]);
        let extraction = extractor().extract(&raw).unwrap();

        assert_eq!(
            extraction.table.records[0].document_type,
            Some(DocumentType::TravelPermit)
        );
    }
}
