//! VehicleInstance entity - a rentable unit of a vehicle

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Document;
use crate::domain::value_objects::{EntityId, EntityKind, InstanceStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInstance {
    pub id: EntityId,
    pub vehicle: EntityId,
    #[serde(default)]
    pub status: InstanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub due_back: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInstanceDraft {
    pub vehicle: EntityId,
    pub status: InstanceStatus,
    pub year: Option<i32>,
    pub customer: Option<String>,
    /// `None` means "now", resolved when the record is built.
    pub due_back: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleInstanceFilter {
    All,
    Vehicle(EntityId),
    Status(InstanceStatus),
}

impl Document for VehicleInstance {
    type Draft = VehicleInstanceDraft;
    type Filter = VehicleInstanceFilter;

    const KIND: EntityKind = EntityKind::VehicleInstance;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: VehicleInstanceDraft) -> Self {
        Self {
            id,
            vehicle: draft.vehicle,
            status: draft.status,
            year: draft.year,
            customer: draft.customer,
            due_back: draft.due_back.unwrap_or_else(Utc::now),
        }
    }

    fn matches(&self, filter: &VehicleInstanceFilter) -> bool {
        match filter {
            VehicleInstanceFilter::All => true,
            VehicleInstanceFilter::Vehicle(id) => &self.vehicle == id,
            VehicleInstanceFilter::Status(status) => &self.status == status,
        }
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.due_back.cmp(&other.due_back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_due_back_defaults_to_now() {
        let before = Utc::now();
        let instance = VehicleInstance::from_draft(
            EntityId::generate(),
            VehicleInstanceDraft {
                vehicle: EntityId::generate(),
                status: InstanceStatus::default(),
                year: None,
                customer: None,
                due_back: None,
            },
        );
        assert!(instance.due_back >= before);
        assert_eq!(instance.status, InstanceStatus::Maintenance);
    }

    #[test]
    fn stored_form_omits_absent_fields() {
        let instance = VehicleInstance::from_draft(
            EntityId::generate(),
            VehicleInstanceDraft {
                vehicle: EntityId::generate(),
                status: InstanceStatus::Loaned,
                year: None,
                customer: None,
                due_back: None,
            },
        );
        let json = serde_json::to_value(&instance).unwrap();
        assert!(json.get("customer").is_none());
        assert_eq!(json["status"], "Loaned");
    }
}
