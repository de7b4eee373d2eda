//! Domain Value Objects
//!
//! Immutable value types shared by every entity in the catalog.

mod entity_id;
mod entity_kind;
mod instance_status;

pub use entity_id::{EntityId, InvalidEntityId};
pub use entity_kind::EntityKind;
pub use instance_status::{InstanceStatus, UnknownStatus};
