//! Catalog use cases: create, update, delete and composed reads

mod fetched;
mod outcome;
mod use_case;

pub use outcome::CreateOutcome;
pub use use_case::CatalogService;
