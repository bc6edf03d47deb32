//! Schema types for the canonical record model.

mod field;
mod table;
mod types;

pub use field::{FieldCatalog, FieldSpec, ID_NUMBER_PATTERN, NAME_PATTERN, PHONE_NUMBER_PATTERN};
pub use table::{CanonicalRecord, CanonicalTable};
pub use types::{CanonicalField, DocumentType, Gender, Locale};
