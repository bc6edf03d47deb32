//! Splitting the canonical table by gender.

use serde::{Deserialize, Serialize};

use crate::input::DataTable;
use crate::schema::{CanonicalField, CanonicalTable, Gender, Locale};

/// Where records without a derivable gender go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Neither output.
    #[default]
    Drop,
    /// Both outputs, at their original position.
    Both,
    /// A third `unresolved` output.
    Separate,
}

/// Disjoint subsets of a canonical table keyed by gender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub male: CanonicalTable,
    pub female: CanonicalTable,
    /// Present only under [`UnresolvedPolicy::Separate`].
    pub unresolved: Option<CanonicalTable>,
}

/// Split records by gender, keeping source order within each output.
pub fn partition_by_gender(table: &CanonicalTable, policy: UnresolvedPolicy) -> Partition {
    let mut partition = Partition {
        unresolved: (policy == UnresolvedPolicy::Separate).then(CanonicalTable::default),
        ..Default::default()
    };

    for record in &table.records {
        match record.gender {
            Some(Gender::Male) => partition.male.records.push(record.clone()),
            Some(Gender::Female) => partition.female.records.push(record.clone()),
            None => match policy {
                UnresolvedPolicy::Drop => {}
                UnresolvedPolicy::Both => {
                    partition.male.records.push(record.clone());
                    partition.female.records.push(record.clone());
                }
                UnresolvedPolicy::Separate => {
                    if let Some(unresolved) = partition.unresolved.as_mut() {
                        unresolved.records.push(record.clone());
                    }
                }
            },
        }
    }

    partition
}

/// Headers used when no template or configured order is given.
pub fn default_column_order(locale: Locale) -> Vec<String> {
    CanonicalField::DEFAULT_ORDER
        .iter()
        .map(|f| f.header(locale).to_string())
        .collect()
}

/// Render a canonical table with exactly the columns in `order`.
pub fn reorder(table: &CanonicalTable, order: &[String], locale: Locale) -> DataTable {
    table.to_data_table(locale).reorder(order)
}
