//! Document type and gender derived from an identifier string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{DocumentType, Gender};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Checked in order; the first match wins. `\d` also accepts full-width digits.

static NATIONAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{15}|\d{17}[\dXx])$").unwrap());

// H and M prefixes belong to travel permits.
static PASSPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-GI-LN-Za-gi-ln-z][0-9]{7,8}$").unwrap());

static TRAVEL_PERMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[HMhm][0-9]{7,9}$").unwrap());

static NUMERIC_PERMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8,10}$").unwrap());

/// Classify the format of an identifier.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a national ID, passport or travel permit number.
pub fn classify_document_type(id: &str) -> Option<DocumentType> {
    let s = id.trim();

    if NATIONAL_ID.is_match(s) {
        return Some(DocumentType::NationalId);
    }
    if PASSPORT.is_match(s) {
        return Some(DocumentType::Passport);
    }
    if TRAVEL_PERMIT.is_match(s) || NUMERIC_PERMIT.is_match(s) {
        return Some(DocumentType::TravelPermit);
    }
    None
}

/// Value of an ASCII or full-width decimal digit.
fn decimal_value(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => c.to_digit(10),
    }
}

/// Gender from the parity of the second-to-last character.
///
/// Odd is male, even is female. Applied to every identifier regardless of
/// document type; returns `None` when the input is shorter than two
/// characters or that character is not an ASCII or full-width digit.
pub fn classify_gender(id: &str) -> Option<Gender> {
    let mut chars = id.chars().rev();
    chars.next()?;
    let digit = decimal_value(chars.next()?)?;

    if digit % 2 == 1 {
        Some(Gender::Male)
    } else {
        Some(Gender::Female)
    }
}
