//! Canonical table: one normalized record per source row.

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

use super::types::{CanonicalField, DocumentType, Gender, Locale};

/// A single normalized record.
///
/// Source-supplied fields hold the raw cell text (empty when unresolved).
/// The derived fields are `None` when the identifier does not classify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,
    pub identifier_number: String,
    pub phone_number: String,
    pub organization_unit: String,
    pub card_number: String,
    pub document_type: Option<DocumentType>,
    pub gender: Option<Gender>,
}

impl CanonicalRecord {
    /// Render a field as cell text.
    pub fn value(&self, field: CanonicalField, locale: Locale) -> &str {
        match field {
            CanonicalField::Name => &self.name,
            CanonicalField::IdentifierNumber => &self.identifier_number,
            CanonicalField::PhoneNumber => &self.phone_number,
            CanonicalField::OrganizationUnit => &self.organization_unit,
            CanonicalField::CardNumber => &self.card_number,
            CanonicalField::DocumentType => {
                self.document_type.map(|d| d.label(locale)).unwrap_or("")
            }
            CanonicalField::Gender => self.gender.map(|g| g.label(locale)).unwrap_or(""),
        }
    }

    /// Mutable slot for a source-supplied field.
    ///
    /// Returns `None` for derived fields, which are never assigned from source data.
    pub fn slot_mut(&mut self, field: CanonicalField) -> Option<&mut String> {
        match field {
            CanonicalField::Name => Some(&mut self.name),
            CanonicalField::IdentifierNumber => Some(&mut self.identifier_number),
            CanonicalField::PhoneNumber => Some(&mut self.phone_number),
            CanonicalField::OrganizationUnit => Some(&mut self.organization_unit),
            CanonicalField::CardNumber => Some(&mut self.card_number),
            CanonicalField::DocumentType | CanonicalField::Gender => None,
        }
    }
}

/// Ordered sequence of canonical records, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one field, in row order.
    pub fn column(&self, field: CanonicalField, locale: Locale) -> Vec<&str> {
        self.records.iter().map(|r| r.value(field, locale)).collect()
    }

    /// Render every canonical field as a string table, in canonical order.
    pub fn to_data_table(&self, locale: Locale) -> DataTable {
        let headers = CanonicalField::ALL
            .iter()
            .map(|f| f.header(locale).to_string())
            .collect();
        let rows = self
            .records
            .iter()
            .map(|r| {
                CanonicalField::ALL
                    .iter()
                    .map(|f| r.value(*f, locale).to_string())
                    .collect()
            })
            .collect();
        DataTable::new(headers, rows)
    }
}
