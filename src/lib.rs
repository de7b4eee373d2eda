//! autolot - vehicle rental catalog
//!
//! Stores manufacturers, vehicle types, vehicles and rentable vehicle
//! instances. Every write passes a validation pipeline, deletes are refused
//! while other records still reference the target, and reads fan out
//! concurrently before being composed into display-ready views.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{CatalogService, CreateOutcome};
pub use config::Config;
pub use domain::entities::{Manufacturer, Vehicle, VehicleInstance, VehicleType};
pub use domain::validation::{FieldMap, FieldValue};
pub use domain::value_objects::{EntityId, EntityKind, InstanceStatus};
pub use error::{CatalogError, CatalogResult};
pub use infrastructure::{JsonFileStore, MemoryStore};
