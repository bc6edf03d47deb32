//! Core type definitions for the canonical record schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language used to render headers and derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// Chinese labels (姓名, 身份证, 男, ...).
    #[default]
    #[serde(alias = "zh")]
    Chinese,
    /// English labels (Name, NationalID, Male, ...).
    #[serde(alias = "en")]
    English,
}

/// One of the fixed attributes every record is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    IdentifierNumber,
    PhoneNumber,
    OrganizationUnit,
    CardNumber,
    /// Derived from the identifier number.
    DocumentType,
    /// Derived from the identifier number.
    Gender,
}

impl CanonicalField {
    /// All fields in canonical table order.
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Name,
        CanonicalField::IdentifierNumber,
        CanonicalField::PhoneNumber,
        CanonicalField::OrganizationUnit,
        CanonicalField::CardNumber,
        CanonicalField::DocumentType,
        CanonicalField::Gender,
    ];

    /// Output column order used when no template is supplied.
    pub const DEFAULT_ORDER: [CanonicalField; 6] = [
        CanonicalField::Name,
        CanonicalField::DocumentType,
        CanonicalField::IdentifierNumber,
        CanonicalField::PhoneNumber,
        CanonicalField::OrganizationUnit,
        CanonicalField::CardNumber,
    ];

    /// Returns true for fields computed from the identifier rather than read.
    pub fn is_derived(&self) -> bool {
        matches!(self, CanonicalField::DocumentType | CanonicalField::Gender)
    }

    /// Column header for this field.
    pub fn header(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Chinese => match self {
                CanonicalField::Name => "姓名",
                CanonicalField::IdentifierNumber => "证件号",
                CanonicalField::PhoneNumber => "手机号",
                CanonicalField::OrganizationUnit => "所属组织/部门",
                CanonicalField::CardNumber => "体检卡号",
                CanonicalField::DocumentType => "证件类型",
                CanonicalField::Gender => "性别",
            },
            Locale::English => match self {
                CanonicalField::Name => "Name",
                CanonicalField::IdentifierNumber => "IdentifierNumber",
                CanonicalField::PhoneNumber => "PhoneNumber",
                CanonicalField::OrganizationUnit => "OrganizationUnit",
                CanonicalField::CardNumber => "CardNumber",
                CanonicalField::DocumentType => "DocumentType",
                CanonicalField::Gender => "Gender",
            },
        }
    }

    /// Find the field whose header in `locale` equals `header`.
    pub fn from_header(header: &str, locale: Locale) -> Option<CanonicalField> {
        Self::ALL.into_iter().find(|f| f.header(locale) == header)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header(Locale::English))
    }
}

/// Coarse classification of an identifier string's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Resident identity card (15 digits, or 17 digits plus check character).
    NationalId,
    /// One letter followed by 7-8 digits.
    Passport,
    /// Mainland travel permit for Hong Kong, Macau and Taiwan residents.
    TravelPermit,
}

impl DocumentType {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Chinese, DocumentType::NationalId) => "身份证",
            (Locale::Chinese, DocumentType::Passport) => "护照",
            (Locale::Chinese, DocumentType::TravelPermit) => "港澳台通行证",
            (Locale::English, DocumentType::NationalId) => "NationalID",
            (Locale::English, DocumentType::Passport) => "Passport",
            (Locale::English, DocumentType::TravelPermit) => "TravelPermit",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::English))
    }
}

/// Sex encoded in the second-to-last identifier digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Chinese, Gender::Male) => "男",
            (Locale::Chinese, Gender::Female) => "女",
            (Locale::English, Gender::Male) => "Male",
            (Locale::English, Gender::Female) => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::English))
    }
}
