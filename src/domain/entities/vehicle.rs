//! Vehicle entity
//!
//! A vehicle holds exactly one manufacturer reference and any number of
//! vehicle-type references. Neither is re-checked after the write.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Document;
use crate::domain::value_objects::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: EntityId,
    pub manufacturer: EntityId,
    pub model: String,
    #[serde(default)]
    pub vehicle_types: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub manufacturer: EntityId,
    pub model: String,
    pub vehicle_types: Vec<EntityId>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleFilter {
    All,
    /// Vehicles made by the given manufacturer.
    Manufacturer(EntityId),
    /// Vehicles whose type list contains the given vehicle type.
    HasVehicleType(EntityId),
}

impl Document for Vehicle {
    type Draft = VehicleDraft;
    type Filter = VehicleFilter;

    const KIND: EntityKind = EntityKind::Vehicle;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: VehicleDraft) -> Self {
        Self {
            id,
            manufacturer: draft.manufacturer,
            model: draft.model,
            vehicle_types: draft.vehicle_types,
            price: draft.price,
        }
    }

    fn matches(&self, filter: &VehicleFilter) -> bool {
        match filter {
            VehicleFilter::All => true,
            VehicleFilter::Manufacturer(id) => &self.manufacturer == id,
            VehicleFilter::HasVehicleType(id) => self.vehicle_types.contains(id),
        }
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.model.cmp(&other.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_filter_checks_type_list() {
        let suv = EntityId::generate();
        let truck = EntityId::generate();
        let vehicle = Vehicle::from_draft(
            EntityId::generate(),
            VehicleDraft {
                manufacturer: EntityId::generate(),
                model: "F-150".to_string(),
                vehicle_types: vec![truck],
                price: None,
            },
        );

        assert!(vehicle.matches(&VehicleFilter::HasVehicleType(truck)));
        assert!(!vehicle.matches(&VehicleFilter::HasVehicleType(suv)));
    }
}
