//! Referential Integrity Guard
//!
//! Decides whether a record may be physically deleted by looking up the
//! records that reference it. The lookup and the delete that follows are
//! separate store calls, so a dependent created in between is not seen.

use serde::Serialize;
use tracing::debug;

use crate::domain::entities::{Vehicle, VehicleFilter, VehicleInstance, VehicleInstanceFilter};
use crate::domain::ports::{Repositories, StoreResult};
use crate::domain::value_objects::{EntityId, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Manufacturer(EntityId),
    VehicleType(EntityId),
    Vehicle(EntityId),
    VehicleInstance(EntityId),
}

impl DeleteTarget {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        match kind {
            EntityKind::Manufacturer => DeleteTarget::Manufacturer(id),
            EntityKind::VehicleType => DeleteTarget::VehicleType(id),
            EntityKind::Vehicle => DeleteTarget::Vehicle(id),
            EntityKind::VehicleInstance => DeleteTarget::VehicleInstance(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            DeleteTarget::Manufacturer(_) => EntityKind::Manufacturer,
            DeleteTarget::VehicleType(_) => EntityKind::VehicleType,
            DeleteTarget::Vehicle(_) => EntityKind::Vehicle,
            DeleteTarget::VehicleInstance(_) => EntityKind::VehicleInstance,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            DeleteTarget::Manufacturer(id)
            | DeleteTarget::VehicleType(id)
            | DeleteTarget::Vehicle(id)
            | DeleteTarget::VehicleInstance(id) => *id,
        }
    }
}

/// Records that currently reference a delete target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum Dependents {
    Vehicles(Vec<Vehicle>),
    Instances(Vec<VehicleInstance>),
}

impl Dependents {
    pub fn len(&self) -> usize {
        match self {
            Dependents::Vehicles(v) => v.len(),
            Dependents::Instances(i) => i.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<EntityId> {
        match self {
            Dependents::Vehicles(v) => v.iter().map(|r| r.id).collect(),
            Dependents::Instances(i) => i.iter().map(|r| r.id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteCheck {
    Allowed,
    Blocked(Dependents),
}

impl DeleteCheck {
    fn from_dependents(dependents: Dependents) -> Self {
        if dependents.is_empty() {
            DeleteCheck::Allowed
        } else {
            DeleteCheck::Blocked(dependents)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, DeleteCheck::Allowed)
    }
}

#[derive(Clone)]
pub struct IntegrityGuard {
    repos: Repositories,
}

impl IntegrityGuard {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Current dependents of `target`, or `None` for kinds nothing references.
    pub async fn dependents(&self, target: &DeleteTarget) -> StoreResult<Option<Dependents>> {
        let dependents = match *target {
            DeleteTarget::Manufacturer(id) => Some(Dependents::Vehicles(
                self.repos
                    .vehicles
                    .find(&VehicleFilter::Manufacturer(id), None)
                    .await?,
            )),
            DeleteTarget::VehicleType(id) => Some(Dependents::Vehicles(
                self.repos
                    .vehicles
                    .find(&VehicleFilter::HasVehicleType(id), None)
                    .await?,
            )),
            DeleteTarget::Vehicle(id) => Some(Dependents::Instances(
                self.repos
                    .instances
                    .find(&VehicleInstanceFilter::Vehicle(id), None)
                    .await?,
            )),
            DeleteTarget::VehicleInstance(_) => None,
        };
        Ok(dependents)
    }

    pub async fn can_delete(&self, target: &DeleteTarget) -> StoreResult<DeleteCheck> {
        let check = match self.dependents(target).await? {
            Some(dependents) => DeleteCheck::from_dependents(dependents),
            None => DeleteCheck::Allowed,
        };
        debug!(
            kind = %target.kind(),
            id = %target.id(),
            allowed = check.is_allowed(),
            "checked delete"
        );
        Ok(check)
    }
}
