//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports, validation)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates concurrent store lookups and hands results to the composer
//!
//! ## Use Cases
//!
//! - `CatalogService` - Create/update/delete with validation and integrity checks, composed reads
//!
//! ## Services
//!
//! - `Aggregate` - Named concurrent lookups joined into one result map

pub mod aggregate;
pub mod catalog;

pub use aggregate::{Aggregate, Combined, DuplicateQuery};
pub use catalog::{CatalogService, CreateOutcome};
