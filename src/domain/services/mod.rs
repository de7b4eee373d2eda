//! Domain Services
//!
//! Business logic that operates on domain entities.
//! The composer is pure. The integrity guard reads through the repository
//! ports and never mutates.

mod composer;
mod integrity;

pub use composer::{
    format_due_date, CatalogSummary, Choice, DeletePreview, DependentViews, InstanceFormOptions,
    ManufacturerDetail, ManufacturerSummary, ManufacturerView, ReadModelComposer, RecordView,
    StatusChoice, VehicleDetail, VehicleFormOptions, VehicleInstanceDetail, VehicleInstanceView,
    VehicleSummary, VehicleTypeDetail, VehicleTypeSummary, VehicleTypeView, VehicleView,
};
pub use integrity::{DeleteCheck, DeleteTarget, Dependents, IntegrityGuard};
