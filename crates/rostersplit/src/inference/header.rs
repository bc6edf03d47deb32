//! Locating the real header row beneath decorative preamble rows.

use serde::{Deserialize, Serialize};

use crate::input::RawSheet;

/// Header detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Number of leading rows examined.
    pub max_scan: usize,
    /// Substrings that mark a header row (case-sensitive).
    pub keywords: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            max_scan: 5,
            keywords: [
                "姓名",
                "证件号",
                "身份证",
                "手机号",
                "电话",
                "Name",
                "IDNumber",
                "NationalID",
                "PhoneNumber",
                "Phone",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Finds the header row of a raw sheet.
#[derive(Debug, Clone, Default)]
pub struct HeaderLocator {
    config: HeaderConfig,
}

impl HeaderLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeaderConfig) -> Self {
        Self { config }
    }

    /// Index of the first scanned row whose joined cells contain a keyword.
    ///
    /// Falls back to row 0 when nothing matches.
    pub fn locate(&self, sheet: &RawSheet) -> usize {
        locate_header_row(&sheet.rows, &self.config.keywords, self.config.max_scan)
    }
}

/// Scan at most `max_scan` rows for a keyword and return the first hit, or 0.
pub fn locate_header_row<S: AsRef<str>>(
    rows: &[Vec<String>],
    keywords: &[S],
    max_scan: usize,
) -> usize {
    rows.iter()
        .take(max_scan)
        .position(|row| {
            let joined = row.concat();
            keywords.iter().any(|kw| joined.contains(kw.as_ref()))
        })
        .unwrap_or(0)
}
