//! Entity kind value object
//!
//! Names the four catalog collections and the canonical path prefix used
//! when a read model links back to a record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Manufacturer,
    VehicleType,
    Vehicle,
    VehicleInstance,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Manufacturer,
        EntityKind::VehicleType,
        EntityKind::Vehicle,
        EntityKind::VehicleInstance,
    ];

    /// Name of the backing collection.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Manufacturer => "manufacturers",
            EntityKind::VehicleType => "vehicle_types",
            EntityKind::Vehicle => "vehicles",
            EntityKind::VehicleInstance => "vehicle_instances",
        }
    }

    /// Human-readable label, used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Manufacturer => "manufacturer",
            EntityKind::VehicleType => "vehicle type",
            EntityKind::Vehicle => "vehicle",
            EntityKind::VehicleInstance => "vehicle instance",
        }
    }

    fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Manufacturer => "manufacturer",
            EntityKind::VehicleType => "vehicletype",
            EntityKind::Vehicle => "vehicle",
            EntityKind::VehicleInstance => "vehicleinstance",
        }
    }

    /// Canonical reference path for a record of this kind.
    pub fn url_for(&self, id: &EntityId) -> String {
        format!("/{}/{}", self.path_segment(), id)
    }

    /// Path of the listing that a record of this kind belongs to.
    pub fn list_url(&self) -> String {
        format!("/{}s", self.path_segment())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_kind_prefix() {
        let id = EntityId::generate();
        assert_eq!(
            EntityKind::VehicleType.url_for(&id),
            format!("/vehicletype/{}", id)
        );
        assert_eq!(EntityKind::VehicleInstance.list_url(), "/vehicleinstances");
    }

    #[test]
    fn collections_are_distinct() {
        let mut names: Vec<_> = EntityKind::ALL.iter().map(|k| k.collection()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
