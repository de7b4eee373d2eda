//! VehicleType entity

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Document;
use crate::domain::value_objects::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: EntityId,
    /// Natural key; unique across live vehicle types.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleTypeDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleTypeFilter {
    All,
    Name(String),
}

impl Document for VehicleType {
    type Draft = VehicleTypeDraft;
    type Filter = VehicleTypeFilter;

    const KIND: EntityKind = EntityKind::VehicleType;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: VehicleTypeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn matches(&self, filter: &VehicleTypeFilter) -> bool {
        match filter {
            VehicleTypeFilter::All => true,
            VehicleTypeFilter::Name(name) => &self.name == name,
        }
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
