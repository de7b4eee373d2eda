//! Store adapters implementing the `Repository` port
//!
//! - `MemoryStore` - process-local collections, used for tests and `backend = "memory"`
//! - `JsonFileStore` - one JSON file per collection under a data directory

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use crate::domain::entities::Document;
use crate::domain::ports::SortOrder;
use crate::domain::value_objects::EntityId;

/// Filter and order one collection. Without a sort, identifier order is kept.
fn select<D: Document>(
    docs: &BTreeMap<EntityId, D>,
    filter: &D::Filter,
    sort: Option<SortOrder>,
) -> Vec<D> {
    let mut selected: Vec<D> = docs.values().filter(|d| d.matches(filter)).cloned().collect();
    match sort {
        Some(SortOrder::Ascending) => selected.sort_by(|a, b| a.natural_cmp(b)),
        Some(SortOrder::Descending) => selected.sort_by(|a, b| b.natural_cmp(a)),
        None => {}
    }
    selected
}
