//! Manufacturer entity

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Document;
use crate::domain::value_objects::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: EntityId,
    /// Natural key; unique across live manufacturers.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerDraft {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManufacturerFilter {
    All,
    Name(String),
}

impl Document for Manufacturer {
    type Draft = ManufacturerDraft;
    type Filter = ManufacturerFilter;

    const KIND: EntityKind = EntityKind::Manufacturer;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: ManufacturerDraft) -> Self {
        Self {
            id,
            name: draft.name,
            country: draft.country,
        }
    }

    fn matches(&self, filter: &ManufacturerFilter) -> bool {
        match filter {
            ManufacturerFilter::All => true,
            ManufacturerFilter::Name(name) => &self.name == name,
        }
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
