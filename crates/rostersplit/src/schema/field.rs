//! Field catalog: how each canonical field is found in a source table.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

use super::types::CanonicalField;

/// Resolution rules for a single source-supplied field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Target field.
    pub field: CanonicalField,
    /// Acceptable source headers, in priority order (exact match).
    pub aliases: Vec<String>,
    /// Content pattern tried when no alias yields data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_pattern: Option<String>,
}

impl FieldSpec {
    /// Create a spec with aliases and no fallback pattern.
    pub fn new<I, S>(field: CanonicalField, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            aliases: aliases.into_iter().map(Into::into).collect(),
            fallback_pattern: None,
        }
    }

    /// Set the content fallback pattern.
    pub fn with_fallback(mut self, pattern: impl Into<String>) -> Self {
        self.fallback_pattern = Some(pattern.into());
        self
    }
}

/// Ordered table of field specs driving column resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    specs: Vec<FieldSpec>,
}

/// 18-digit resident identity number.
pub const ID_NUMBER_PATTERN: &str = r"^\d{17}[\dXx]$";
/// Mainland mobile number.
pub const PHONE_NUMBER_PATTERN: &str = r"^1[3-9]\d{9}$";
/// Two to four CJK ideographs.
pub const NAME_PATTERN: &str = r"^[\x{4e00}-\x{9fa5}]{2,4}$";

impl FieldCatalog {
    /// Build a catalog, rejecting derived fields and duplicates.
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        let catalog = Self { specs };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Catalog covering every source-supplied field.
    pub fn full() -> Self {
        Self {
            specs: vec![
                Self::name_spec(),
                Self::id_spec(),
                Self::phone_spec(),
                FieldSpec::new(
                    CanonicalField::OrganizationUnit,
                    [
                        "所属组织/部门",
                        "部门",
                        "组织",
                        "组织/部门",
                        "单位",
                        "单位或就业形态",
                        "OrganizationUnit",
                    ],
                ),
                FieldSpec::new(CanonicalField::CardNumber, ["体检卡号", "卡号", "CardNumber"]),
            ],
        }
    }

    /// Catalog with only name, identifier and phone.
    pub fn basic() -> Self {
        Self {
            specs: vec![Self::name_spec(), Self::id_spec(), Self::phone_spec()],
        }
    }

    fn name_spec() -> FieldSpec {
        FieldSpec::new(
            CanonicalField::Name,
            ["姓名", "name", "Name", "参检人", "姓名(全称)"],
        )
        .with_fallback(NAME_PATTERN)
    }

    fn id_spec() -> FieldSpec {
        FieldSpec::new(
            CanonicalField::IdentifierNumber,
            [
                "证件号",
                "身份证号",
                "身份证号码",
                "IDNumber",
                "IdentifierNumber",
                "NationalID",
            ],
        )
        .with_fallback(ID_NUMBER_PATTERN)
    }

    fn phone_spec() -> FieldSpec {
        FieldSpec::new(
            CanonicalField::PhoneNumber,
            [
                "手机号",
                "电话",
                "电话号码",
                "mobile",
                "Mobile",
                "Phone",
                "PhoneNumber",
            ],
        )
        .with_fallback(PHONE_NUMBER_PATTERN)
    }

    /// Check that only source-supplied fields appear, each at most once.
    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            if spec.field.is_derived() {
                return Err(SplitError::Config(format!(
                    "'{}' is derived from the identifier and cannot be mapped from a source column",
                    spec.field
                )));
            }
            if seen.contains(&spec.field) {
                return Err(SplitError::Config(format!(
                    "field '{}' appears more than once in the catalog",
                    spec.field
                )));
            }
            seen.push(spec.field);
        }
        Ok(())
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Get the spec for a field.
    pub fn get(&self, field: CanonicalField) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.field == field)
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_catalog_is_valid() {
        assert!(FieldCatalog::full().validate().is_ok());
        assert_eq!(FieldCatalog::full().specs().len(), 5);
        assert_eq!(FieldCatalog::basic().specs().len(), 3);
    }

    #[test]
    fn test_rejects_derived_field() {
        let result = FieldCatalog::new(vec![FieldSpec::new(CanonicalField::Gender, ["性别"])]);
        assert!(matches!(result, Err(SplitError::Config(_))));
    }

    #[test]
    fn test_rejects_duplicate_field() {
        let result = FieldCatalog::new(vec![
            FieldSpec::new(CanonicalField::Name, ["姓名"]),
            FieldSpec::new(CanonicalField::Name, ["name"]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"[
            {"field": "name", "aliases": ["Full Name"]},
            {"field": "identifier_number", "aliases": ["ID"], "fallback_pattern": "^[0-9]{18}$"}
        ]"#;
        let catalog: FieldCatalog = serde_json::from_str(json).unwrap();
        let id = catalog.get(CanonicalField::IdentifierNumber).unwrap();
        assert_eq!(id.aliases, vec!["ID"]);
        assert_eq!(id.fallback_pattern.as_deref(), Some("^[0-9]{18}$"));
        assert!(catalog.get(CanonicalField::PhoneNumber).is_none());
    }
}
