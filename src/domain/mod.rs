//! Domain Layer
//!
//! The catalog's records and the rules that keep them consistent.
//!
//! ## Structure
//!
//! - `entities/` - Stored documents (Manufacturer, VehicleType, Vehicle, VehicleInstance)
//! - `value_objects/` - Identifiers, entity kinds, instance status
//! - `validation/` - Write-boundary pipeline: presence, format, normalization, sanitization
//! - `services/` - Integrity guard and read model composer
//! - `ports/` - Repository interface implemented by infrastructure
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - Storage is reached only through `ports`
//! 2. **Typed drafts** - Raw field maps never leave the validation module
//! 3. **Ports & Adapters** - Stores are swappable behind `Repository<D>`

pub mod entities;
pub mod ports;
pub mod services;
pub mod validation;
pub mod value_objects;
