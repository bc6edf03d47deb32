//! Property-based tests for Rostersplit classifiers and table shaping.
//!
//! These tests use proptest to generate random inputs and verify that the
//! identifier classifiers and the partition/reorder steps keep their
//! invariants under all conditions.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p rostersplit --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p rostersplit --test property_tests
//! ```

use proptest::prelude::*;

use rostersplit::inference::locate_header_row;
use rostersplit::transform::{partition_by_gender, reorder};
use rostersplit::{
    classify_document_type, classify_gender, CanonicalRecord, CanonicalTable, DocumentType,
    Gender, Locale, UnresolvedPolicy,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Strings that look like identifiers of every kind
fn identifier_like() -> impl Strategy<Value = String> {
    prop_oneof![
        // Resident identity numbers
        "[0-9]{17}[0-9Xx]",
        "[0-9]{15}",
        // Passports
        "[A-Za-z][0-9]{7,8}",
        // Travel permits
        "[HMhm][0-9]{7,9}",
        // Padded
        " {0,3}[0-9]{17}[0-9X] {0,3}",
        // Random
        "[A-Za-z0-9]{0,20}",
    ]
}

/// Arbitrary unicode text
fn any_text() -> impl Strategy<Value = String> {
    "\\PC{0,40}"
}

fn record_strategy() -> impl Strategy<Value = CanonicalRecord> {
    (
        "[a-z]{1,8}",
        prop::option::of(prop_oneof![Just(Gender::Male), Just(Gender::Female)]),
    )
        .prop_map(|(name, gender)| CanonicalRecord {
            name,
            gender,
            ..Default::default()
        })
}

fn table_strategy() -> impl Strategy<Value = CanonicalTable> {
    prop::collection::vec(record_strategy(), 0..40).prop_map(CanonicalTable::new)
}

// =============================================================================
// Classifier Properties
// =============================================================================

mod classifier_tests {
    use super::*;

    proptest! {
        /// Classifiers never panic on any input.
        #[test]
        fn never_panic(input in any_text()) {
            let _ = classify_document_type(&input);
            let _ = classify_gender(&input);
        }

        /// Strings shorter than two characters have no gender.
        #[test]
        fn short_strings_have_no_gender(input in "\\PC{0,1}") {
            prop_assert_eq!(classify_gender(&input), None);
        }

        /// A non-digit second-to-last character yields no gender.
        #[test]
        fn non_digit_penultimate_has_no_gender(
            prefix in "[0-9]{0,16}",
            penultimate in "[A-Za-z ]",
            last in "[0-9X]",
        ) {
            let input = format!("{}{}{}", prefix, penultimate, last);
            prop_assert_eq!(classify_gender(&input), None);
        }

        /// Gender follows the parity of the second-to-last digit.
        #[test]
        fn gender_follows_parity(prefix in "[0-9]{16}", digit in 0u32..10, last in "[0-9X]") {
            let input = format!("{}{}{}", prefix, digit, last);
            let expected = if digit % 2 == 1 { Gender::Male } else { Gender::Female };
            prop_assert_eq!(classify_gender(&input), Some(expected));
        }

        /// Every 18-character resident number classifies as a national ID.
        #[test]
        fn resident_numbers_are_national_ids(input in "[0-9]{17}[0-9Xx]") {
            prop_assert_eq!(classify_document_type(&input), Some(DocumentType::NationalId));
        }

        /// H and M prefixed numbers are travel permits, never passports.
        #[test]
        fn travel_permits_are_not_passports(input in "[HMhm][0-9]{7,9}") {
            prop_assert_eq!(classify_document_type(&input), Some(DocumentType::TravelPermit));
        }

        /// Surrounding whitespace does not change the document type.
        #[test]
        fn document_type_ignores_padding(input in identifier_like(), pad in " {0,4}") {
            let padded = format!("{}{}{}", pad, input, pad);
            prop_assert_eq!(classify_document_type(&padded), classify_document_type(&input));
        }

        /// Classification is deterministic.
        #[test]
        fn classification_is_deterministic(input in identifier_like()) {
            prop_assert_eq!(classify_document_type(&input), classify_document_type(&input));
            prop_assert_eq!(classify_gender(&input), classify_gender(&input));
        }
    }
}

// =============================================================================
// Header Location Properties
// =============================================================================

mod header_tests {
    use super::*;

    proptest! {
        /// The located header row is always within the scanned rows.
        #[test]
        fn header_row_within_scan(
            rows in prop::collection::vec(prop::collection::vec("[a-z姓名]{0,6}", 0..5), 0..12),
            max_scan in 1usize..8,
        ) {
            let keywords = ["姓名", "Name"];
            let row = locate_header_row(&rows, &keywords, max_scan);
            prop_assert!(row < max_scan.max(1));
        }

        /// Decorative rows above a keyword row are skipped.
        #[test]
        fn decorative_rows_skipped(preamble in prop::collection::vec("[a-z0-9 ]{0,10}", 0..4)) {
            let mut rows: Vec<Vec<String>> = preamble.iter().map(|t| vec![t.clone()]).collect();
            rows.push(vec!["序号".to_string(), "姓名".to_string()]);

            let row = locate_header_row(&rows, &["姓名"], 5);
            prop_assert_eq!(row, preamble.len());
        }
    }
}

// =============================================================================
// Partition and Reorder Properties
// =============================================================================

mod partition_tests {
    use super::*;

    proptest! {
        /// Under the default policy outputs are disjoint and cover every resolved record.
        #[test]
        fn default_partition_is_disjoint_and_exhaustive(table in table_strategy()) {
            let partition = partition_by_gender(&table, UnresolvedPolicy::Drop);
            let resolved = table.records.iter().filter(|r| r.gender.is_some()).count();

            prop_assert_eq!(partition.male.len() + partition.female.len(), resolved);
            prop_assert!(partition.male.records.iter().all(|r| r.gender == Some(Gender::Male)));
            prop_assert!(partition.female.records.iter().all(|r| r.gender == Some(Gender::Female)));
        }

        /// The separate policy accounts for every record exactly once.
        #[test]
        fn separate_partition_accounts_for_all(table in table_strategy()) {
            let partition = partition_by_gender(&table, UnresolvedPolicy::Separate);
            let unresolved = partition.unresolved.map(|t| t.len()).unwrap_or(0);

            prop_assert_eq!(
                partition.male.len() + partition.female.len() + unresolved,
                table.len()
            );
        }

        /// Reordering yields exactly the requested columns and one row per record.
        #[test]
        fn reorder_shape(
            table in table_strategy(),
            order in prop::collection::vec(prop_oneof![
                Just("姓名".to_string()),
                Just("性别".to_string()),
                Just("证件号".to_string()),
                "[a-z]{1,6}",
            ], 1..8),
        ) {
            let data = reorder(&table, &order, Locale::Chinese);

            prop_assert_eq!(&data.headers, &order);
            prop_assert_eq!(data.row_count(), table.len());
            prop_assert!(data.rows.iter().all(|row| row.len() == order.len()));
        }

        /// Columns absent from the canonical schema come back empty.
        #[test]
        fn unknown_columns_are_empty(table in table_strategy(), extra in "x[a-z]{1,6}") {
            let order = vec![extra.clone()];
            let data = reorder(&table, &order, Locale::English);

            let values = data.column_by_name(&extra).unwrap_or_default();
            prop_assert_eq!(values.len(), table.len());
            prop_assert!(values.iter().all(|v| v.is_empty()));
        }
    }
}
