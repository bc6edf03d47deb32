//! Extraction and partitioning of canonical records.

mod extract;
mod partition;

pub use extract::{Extraction, Extractor};
pub use partition::{default_column_order, partition_by_gender, reorder, Partition, UnresolvedPolicy};
