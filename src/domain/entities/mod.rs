//! Domain Entities
//!
//! The four catalog records and the contract every stored document meets.
//! - `Manufacturer` - owns vehicles
//! - `VehicleType` - many-to-many with vehicles
//! - `Vehicle` - a model offered by one manufacturer
//! - `VehicleInstance` - a rentable unit of a vehicle

mod manufacturer;
mod vehicle;
mod vehicle_instance;
mod vehicle_type;

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::value_objects::{EntityId, EntityKind};

pub use manufacturer::{Manufacturer, ManufacturerDraft, ManufacturerFilter};
pub use vehicle::{Vehicle, VehicleDraft, VehicleFilter};
pub use vehicle_instance::{VehicleInstance, VehicleInstanceDraft, VehicleInstanceFilter};
pub use vehicle_type::{VehicleType, VehicleTypeDraft, VehicleTypeFilter};

/// A record that can live in a catalog collection.
///
/// Filters are typed per document and only express equality and
/// set-membership tests, which is all the backing store is assumed to offer.
pub trait Document: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Validated field values without an identifier.
    type Draft: Clone + Debug + Send + Sync + 'static;
    /// Equality / membership predicate over stored documents.
    type Filter: Clone + Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Build the stored record for `id`. Used for both insert and replace.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Ordering by the document's natural key (name, model, due date).
    fn natural_cmp(&self, other: &Self) -> Ordering;

    fn url(&self) -> String {
        Self::KIND.url_for(&self.id())
    }
}
