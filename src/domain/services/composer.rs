//! Read Model Composer
//!
//! Expands stored references into embedded summaries and adds the
//! presentation-only fields (reference paths, formatted dates). Everything
//! here works on records the caller already fetched; nothing is persisted.
//!
//! A reference that no longer resolves is rendered as absent: a missing
//! manufacturer becomes `None`, a missing vehicle type is left out.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::domain::entities::{Document, Manufacturer, Vehicle, VehicleInstance, VehicleType};
use super::integrity::Dependents;
use crate::domain::value_objects::{EntityId, InstanceStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerSummary {
    pub id: EntityId,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTypeSummary {
    pub id: EntityId,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub id: EntityId,
    pub model: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerView {
    pub id: EntityId,
    pub url: String,
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTypeView {
    pub id: EntityId,
    pub url: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleView {
    pub id: EntityId,
    pub url: String,
    pub model: String,
    pub price: Option<f64>,
    pub manufacturer: Option<ManufacturerSummary>,
    pub vehicle_types: Vec<VehicleTypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleInstanceView {
    pub id: EntityId,
    pub url: String,
    pub status: InstanceStatus,
    pub year: Option<i32>,
    pub customer: Option<String>,
    pub due_back: DateTime<Utc>,
    /// e.g. `October 14th, 2026`
    pub due_back_formatted: String,
    /// `YYYY-MM-DD`, the value a date input expects.
    pub due_back_iso: String,
    pub vehicle: Option<VehicleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerDetail {
    pub manufacturer: ManufacturerView,
    pub vehicles: Vec<VehicleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTypeDetail {
    pub vehicle_type: VehicleTypeView,
    pub vehicles: Vec<VehicleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleDetail {
    pub vehicle: VehicleView,
    pub instances: Vec<VehicleInstanceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleInstanceDetail {
    pub instance: VehicleInstanceView,
    pub manufacturer: Option<ManufacturerSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum DependentViews {
    None,
    Vehicles(Vec<VehicleSummary>),
    Instances(Vec<VehicleInstanceView>),
}

impl DependentViews {
    pub fn is_empty(&self) -> bool {
        match self {
            DependentViews::None => true,
            DependentViews::Vehicles(v) => v.is_empty(),
            DependentViews::Instances(i) => i.is_empty(),
        }
    }
}

/// Any single record, as shown on a detail or confirmation screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordView {
    Manufacturer(ManufacturerView),
    VehicleType(VehicleTypeView),
    Vehicle(VehicleView),
    VehicleInstance(VehicleInstanceView),
}

/// What the delete confirmation screen shows: the record and whatever
/// currently blocks its removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletePreview<V> {
    pub record: V,
    pub dependents: DependentViews,
    pub deletable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub manufacturers: usize,
    pub vehicle_types: usize,
    pub vehicles: usize,
    pub instances: usize,
    pub available_instances: usize,
}

/// A selectable reference on a create/update form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: EntityId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChoice {
    pub status: InstanceStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleFormOptions {
    pub manufacturers: Vec<Choice>,
    pub vehicle_types: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceFormOptions {
    pub vehicles: Vec<Choice>,
    pub statuses: Vec<StatusChoice>,
}

/// `MMMM Do, YYYY`, e.g. `October 14th, 2026`.
pub fn format_due_date(date: &DateTime<Utc>) -> String {
    format!(
        "{} {}, {}",
        date.format("%B"),
        ordinal(date.day()),
        date.year()
    )
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

/// Lookup tables for the records that stored references point at.
#[derive(Debug, Clone, Default)]
pub struct ReadModelComposer {
    manufacturers: HashMap<EntityId, Manufacturer>,
    vehicle_types: HashMap<EntityId, VehicleType>,
    vehicles: HashMap<EntityId, Vehicle>,
}

impl ReadModelComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manufacturers(mut self, records: impl IntoIterator<Item = Manufacturer>) -> Self {
        self.manufacturers
            .extend(records.into_iter().map(|m| (m.id, m)));
        self
    }

    pub fn with_vehicle_types(mut self, records: impl IntoIterator<Item = VehicleType>) -> Self {
        self.vehicle_types
            .extend(records.into_iter().map(|t| (t.id, t)));
        self
    }

    pub fn with_vehicles(mut self, records: impl IntoIterator<Item = Vehicle>) -> Self {
        self.vehicles.extend(records.into_iter().map(|v| (v.id, v)));
        self
    }

    pub fn manufacturer_by_id(&self, id: &EntityId) -> Option<&Manufacturer> {
        self.manufacturers.get(id)
    }

    pub fn vehicle_type_by_id(&self, id: &EntityId) -> Option<&VehicleType> {
        self.vehicle_types.get(id)
    }

    pub fn vehicle_by_id(&self, id: &EntityId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn manufacturer_summary(&self, id: &EntityId) -> Option<ManufacturerSummary> {
        self.manufacturers.get(id).map(summarize_manufacturer)
    }

    pub fn manufacturer(&self, record: &Manufacturer) -> ManufacturerView {
        ManufacturerView {
            id: record.id,
            url: record.url(),
            name: record.name.clone(),
            country: record.country.clone(),
        }
    }

    pub fn vehicle_type(&self, record: &VehicleType) -> VehicleTypeView {
        VehicleTypeView {
            id: record.id,
            url: record.url(),
            name: record.name.clone(),
            description: record.description.clone(),
        }
    }

    pub fn vehicle(&self, record: &Vehicle) -> VehicleView {
        VehicleView {
            id: record.id,
            url: record.url(),
            model: record.model.clone(),
            price: record.price,
            manufacturer: self.manufacturer_summary(&record.manufacturer),
            vehicle_types: record
                .vehicle_types
                .iter()
                .filter_map(|id| self.vehicle_types.get(id))
                .map(|t| VehicleTypeSummary {
                    id: t.id,
                    name: t.name.clone(),
                    url: t.url(),
                })
                .collect(),
        }
    }

    pub fn instance(&self, record: &VehicleInstance) -> VehicleInstanceView {
        VehicleInstanceView {
            id: record.id,
            url: record.url(),
            status: record.status,
            year: record.year,
            customer: record.customer.clone(),
            due_back: record.due_back,
            due_back_formatted: format_due_date(&record.due_back),
            due_back_iso: record.due_back.format("%Y-%m-%d").to_string(),
            vehicle: self.vehicles.get(&record.vehicle).map(summarize_vehicle),
        }
    }

    pub fn vehicles(&self, records: &[Vehicle]) -> Vec<VehicleView> {
        records.iter().map(|v| self.vehicle(v)).collect()
    }

    pub fn instances(&self, records: &[VehicleInstance]) -> Vec<VehicleInstanceView> {
        records.iter().map(|i| self.instance(i)).collect()
    }

    pub fn dependents(&self, dependents: Option<&Dependents>) -> DependentViews {
        match dependents {
            None => DependentViews::None,
            Some(Dependents::Vehicles(vehicles)) => {
                DependentViews::Vehicles(vehicles.iter().map(summarize_vehicle).collect())
            }
            Some(Dependents::Instances(instances)) => {
                DependentViews::Instances(self.instances(instances))
            }
        }
    }

    pub fn delete_preview<V>(&self, record: V, dependents: Option<&Dependents>) -> DeletePreview<V> {
        let dependents = self.dependents(dependents);
        DeletePreview {
            record,
            deletable: dependents.is_empty(),
            dependents,
        }
    }

    /// Choices for a vehicle form, marking the current record's references.
    pub fn vehicle_form(&self, current: Option<&Vehicle>) -> VehicleFormOptions {
        let mut manufacturers: Vec<_> = self.manufacturers.values().collect();
        manufacturers.sort_by(|a, b| a.natural_cmp(b));
        let mut vehicle_types: Vec<_> = self.vehicle_types.values().collect();
        vehicle_types.sort_by(|a, b| a.natural_cmp(b));

        VehicleFormOptions {
            manufacturers: manufacturers
                .into_iter()
                .map(|m| Choice {
                    id: m.id,
                    label: m.name.clone(),
                    selected: current.is_some_and(|v| v.manufacturer == m.id),
                })
                .collect(),
            vehicle_types: vehicle_types
                .into_iter()
                .map(|t| Choice {
                    id: t.id,
                    label: t.name.clone(),
                    selected: current.is_some_and(|v| v.vehicle_types.contains(&t.id)),
                })
                .collect(),
        }
    }

    pub fn instance_form(&self, current: Option<&VehicleInstance>) -> InstanceFormOptions {
        let mut vehicles: Vec<_> = self.vehicles.values().collect();
        vehicles.sort_by(|a, b| a.natural_cmp(b));
        let current_status = current.map(|i| i.status).unwrap_or_default();

        InstanceFormOptions {
            vehicles: vehicles
                .into_iter()
                .map(|v| Choice {
                    id: v.id,
                    label: v.model.clone(),
                    selected: current.is_some_and(|i| i.vehicle == v.id),
                })
                .collect(),
            statuses: InstanceStatus::ALL
                .iter()
                .map(|&status| StatusChoice {
                    status,
                    selected: status == current_status,
                })
                .collect(),
        }
    }
}

fn summarize_manufacturer(record: &Manufacturer) -> ManufacturerSummary {
    ManufacturerSummary {
        id: record.id,
        name: record.name.clone(),
        url: record.url(),
    }
}

fn summarize_vehicle(record: &Vehicle) -> VehicleSummary {
    VehicleSummary {
        id: record.id,
        model: record.model.clone(),
        url: record.url(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manufacturer(name: &str) -> Manufacturer {
        Manufacturer {
            id: EntityId::generate(),
            name: name.to_string(),
            country: None,
        }
    }

    fn vehicle_type(name: &str) -> VehicleType {
        VehicleType {
            id: EntityId::generate(),
            name: name.to_string(),
            description: None,
        }
    }

    fn vehicle(make: &Manufacturer, types: &[&VehicleType]) -> Vehicle {
        Vehicle {
            id: EntityId::generate(),
            manufacturer: make.id,
            model: "Focus".to_string(),
            vehicle_types: types.iter().map(|t| t.id).collect(),
            price: Some(20000.0),
        }
    }

    #[test]
    fn formats_due_date_with_ordinal() {
        let date = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        assert_eq!(format_due_date(&date), "October 14th, 2026");
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_due_date(&date), "March 1st, 2026");
    }

    #[test]
    fn ordinal_suffixes() {
        let cases = [(1, "1st"), (2, "2nd"), (3, "3rd"), (4, "4th"), (11, "11th"),
            (12, "12th"), (13, "13th"), (21, "21st"), (22, "22nd"), (23, "23rd"), (31, "31st")];
        for (day, expected) in cases {
            assert_eq!(ordinal(day), expected);
        }
    }

    #[test]
    fn vehicle_embeds_manufacturer_and_types() {
        let ford = manufacturer("Ford");
        let suv = vehicle_type("SUV");
        let v = vehicle(&ford, &[&suv]);
        let composer = ReadModelComposer::new()
            .with_manufacturers([ford.clone()])
            .with_vehicle_types([suv.clone()]);

        let view = composer.vehicle(&v);
        assert_eq!(view.url, format!("/vehicle/{}", v.id));
        assert_eq!(view.manufacturer.unwrap().name, "Ford");
        assert_eq!(view.vehicle_types.len(), 1);
        assert_eq!(view.vehicle_types[0].url, format!("/vehicletype/{}", suv.id));
    }

    #[test]
    fn dangling_references_render_as_absent() {
        let ford = manufacturer("Ford");
        let gone = vehicle_type("Gone");
        let v = vehicle(&ford, &[&gone]);

        let view = ReadModelComposer::new().vehicle(&v);
        assert!(view.manufacturer.is_none());
        assert!(view.vehicle_types.is_empty());
    }

    #[test]
    fn instance_view_has_derived_dates() {
        let ford = manufacturer("Ford");
        let v = vehicle(&ford, &[]);
        let instance = VehicleInstance {
            id: EntityId::generate(),
            vehicle: v.id,
            status: InstanceStatus::Loaned,
            year: Some(2020),
            customer: Some("Ada".to_string()),
            due_back: Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap(),
        };
        let view = ReadModelComposer::new().with_vehicles([v.clone()]).instance(&instance);
        assert_eq!(view.due_back_formatted, "October 2nd, 2026");
        assert_eq!(view.due_back_iso, "2026-10-02");
        assert_eq!(view.vehicle.unwrap().model, "Focus");
    }

    #[test]
    fn vehicle_form_marks_current_selection() {
        let ford = manufacturer("Ford");
        let audi = manufacturer("Audi");
        let suv = vehicle_type("SUV");
        let van = vehicle_type("Van");
        let v = vehicle(&ford, &[&van]);

        let form = ReadModelComposer::new()
            .with_manufacturers([ford, audi])
            .with_vehicle_types([suv, van])
            .vehicle_form(Some(&v));

        let labels: Vec<_> = form.manufacturers.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Audi", "Ford"]);
        assert!(form.manufacturers[1].selected);
        assert!(!form.manufacturers[0].selected);
        assert!(!form.vehicle_types[0].selected);
        assert!(form.vehicle_types[1].selected);
    }

    #[test]
    fn instance_form_defaults_to_maintenance() {
        let form = ReadModelComposer::new().instance_form(None);
        let selected: Vec<_> = form.statuses.iter().filter(|s| s.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].status, InstanceStatus::Maintenance);
    }

    #[test]
    fn delete_preview_is_deletable_without_dependents() {
        let ford = manufacturer("Ford");
        let composer = ReadModelComposer::new();
        let view = composer.manufacturer(&ford);
        let preview = composer.delete_preview(view.clone(), Some(&Dependents::Vehicles(vec![])));
        assert!(preview.deletable);

        let v = vehicle(&ford, &[]);
        let preview = composer.delete_preview(view, Some(&Dependents::Vehicles(vec![v])));
        assert!(!preview.deletable);
        assert!(matches!(preview.dependents, DependentViews::Vehicles(ref list) if list.len() == 1));
    }
}
