//! Output Rendering
//!
//! Read models render either as aligned text or as pretty JSON. Refused
//! writes (validation and integrity failures) render here too; everything
//! else propagates to `main`.

use std::fmt::Write as _;

use is_terminal::IsTerminal;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::OutputFormat;
use crate::domain::services::{
    CatalogSummary, Choice, DeletePreview, DependentViews, Dependents, InstanceFormOptions,
    ManufacturerDetail, ManufacturerView, RecordView, VehicleDetail, VehicleFormOptions,
    VehicleInstanceDetail, VehicleInstanceView, VehicleTypeDetail, VehicleTypeView, VehicleView,
};
use crate::domain::validation::{FieldError, FieldMap, FieldValue};
use crate::domain::value_objects::{EntityId, EntityKind};
use crate::error::CatalogError;

/// `--json` wins, then the configured format; otherwise JSON unless stdout
/// is a terminal.
pub fn resolve_format(json: bool, configured: Option<OutputFormat>) -> OutputFormat {
    if json {
        return OutputFormat::Json;
    }
    configured.unwrap_or_else(|| {
        if std::io::stdout().is_terminal() {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    })
}

/// Human-readable rendering of a read model.
pub trait Render {
    fn render_text(&self) -> String;
}

pub fn render<T: Render + Serialize + ?Sized>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.render_text(),
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// Left-aligned columns separated by two spaces, padded by display width.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.width());
            }
        }
    }

    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    for row in std::iter::once(&header_row).chain(rows.iter()) {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            let pad = widths.get(i).copied().unwrap_or(0).saturating_sub(cell.width());
            line.push_str(&" ".repeat(pad + 2));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn price(value: Option<f64>) -> String {
    value.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string())
}

fn manufacturer_rows(records: &[ManufacturerView]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|m| vec![m.id.to_string(), m.name.clone(), or_dash(m.country.as_deref())])
        .collect()
}

fn vehicle_rows(records: &[VehicleView]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|v| {
            let types: Vec<&str> = v.vehicle_types.iter().map(|t| t.name.as_str()).collect();
            vec![
                v.id.to_string(),
                v.model.clone(),
                or_dash(v.manufacturer.as_ref().map(|m| m.name.as_str())),
                if types.is_empty() { "-".to_string() } else { types.join(", ") },
                price(v.price),
            ]
        })
        .collect()
}

fn instance_rows(records: &[VehicleInstanceView]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                or_dash(i.vehicle.as_ref().map(|v| v.model.as_str())),
                i.status.to_string(),
                i.due_back_formatted.clone(),
                or_dash(i.customer.as_deref()),
            ]
        })
        .collect()
}

fn vehicle_table(records: &[VehicleView]) -> String {
    table(
        &["ID", "MODEL", "MANUFACTURER", "TYPES", "PRICE"],
        &vehicle_rows(records),
    )
}

fn instance_table(records: &[VehicleInstanceView]) -> String {
    table(
        &["ID", "VEHICLE", "STATUS", "DUE BACK", "CUSTOMER"],
        &instance_rows(records),
    )
}

fn section(out: &mut String, title: &str, count: usize, body: String) {
    let _ = writeln!(out);
    if count == 0 {
        let _ = writeln!(out, "{}: none", title);
    } else {
        let _ = writeln!(out, "{} ({}):", title, count);
        out.push_str(&body);
    }
}

impl Render for CatalogSummary {
    fn render_text(&self) -> String {
        format!(
            "Manufacturers: {}\nVehicle types: {}\nVehicles: {}\nVehicle instances: {} ({} available)\n",
            self.manufacturers,
            self.vehicle_types,
            self.vehicles,
            self.instances,
            self.available_instances
        )
    }
}

impl Render for Vec<ManufacturerView> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No manufacturers.\n".to_string();
        }
        table(&["ID", "NAME", "COUNTRY"], &manufacturer_rows(self))
    }
}

impl Render for Vec<VehicleTypeView> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No vehicle types.\n".to_string();
        }
        let rows: Vec<Vec<String>> = self
            .iter()
            .map(|t| vec![t.id.to_string(), t.name.clone(), or_dash(t.description.as_deref())])
            .collect();
        table(&["ID", "NAME", "DESCRIPTION"], &rows)
    }
}

impl Render for Vec<VehicleView> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No vehicles.\n".to_string();
        }
        vehicle_table(self)
    }
}

impl Render for Vec<VehicleInstanceView> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No vehicle instances.\n".to_string();
        }
        instance_table(self)
    }
}

impl Render for ManufacturerDetail {
    fn render_text(&self) -> String {
        let m = &self.manufacturer;
        let mut out = format!("Manufacturer: {}\n  id: {}\n  url: {}\n", m.name, m.id, m.url);
        if let Some(country) = &m.country {
            let _ = writeln!(out, "  country: {}", country);
        }
        section(&mut out, "Vehicles", self.vehicles.len(), vehicle_table(&self.vehicles));
        out
    }
}

impl Render for VehicleTypeDetail {
    fn render_text(&self) -> String {
        let t = &self.vehicle_type;
        let mut out = format!("Vehicle type: {}\n  id: {}\n  url: {}\n", t.name, t.id, t.url);
        if let Some(description) = &t.description {
            let _ = writeln!(out, "  description: {}", description);
        }
        section(&mut out, "Vehicles", self.vehicles.len(), vehicle_table(&self.vehicles));
        out
    }
}

impl Render for VehicleDetail {
    fn render_text(&self) -> String {
        let v = &self.vehicle;
        let mut out = format!("Vehicle: {}\n  id: {}\n  url: {}\n", v.model, v.id, v.url);
        let _ = writeln!(
            out,
            "  manufacturer: {}",
            or_dash(v.manufacturer.as_ref().map(|m| m.name.as_str()))
        );
        let types: Vec<&str> = v.vehicle_types.iter().map(|t| t.name.as_str()).collect();
        if !types.is_empty() {
            let _ = writeln!(out, "  types: {}", types.join(", "));
        }
        if let Some(p) = v.price {
            let _ = writeln!(out, "  price: {:.2}", p);
        }
        section(
            &mut out,
            "Instances",
            self.instances.len(),
            instance_table(&self.instances),
        );
        out
    }
}

impl Render for VehicleInstanceDetail {
    fn render_text(&self) -> String {
        let i = &self.instance;
        let mut out = format!(
            "Vehicle instance: {}\n  url: {}\n  vehicle: {}\n  manufacturer: {}\n  status: {}\n",
            i.id,
            i.url,
            or_dash(i.vehicle.as_ref().map(|v| v.model.as_str())),
            or_dash(self.manufacturer.as_ref().map(|m| m.name.as_str())),
            i.status,
        );
        if let Some(year) = i.year {
            let _ = writeln!(out, "  year: {}", year);
        }
        if let Some(customer) = &i.customer {
            let _ = writeln!(out, "  customer: {}", customer);
        }
        let _ = writeln!(out, "  due back: {}", i.due_back_formatted);
        out
    }
}

fn record_heading(record: &RecordView) -> (EntityKind, String, &str) {
    match record {
        RecordView::Manufacturer(m) => (EntityKind::Manufacturer, m.name.clone(), &m.url),
        RecordView::VehicleType(t) => (EntityKind::VehicleType, t.name.clone(), &t.url),
        RecordView::Vehicle(v) => (EntityKind::Vehicle, v.model.clone(), &v.url),
        RecordView::VehicleInstance(i) => (
            EntityKind::VehicleInstance,
            format!("{} ({})", i.id, i.status),
            &i.url,
        ),
    }
}

impl Render for DeletePreview<RecordView> {
    fn render_text(&self) -> String {
        let (kind, title, url) = record_heading(&self.record);
        let mut out = format!("{} {} ({})\n", kind, title, url);
        match &self.dependents {
            _ if self.deletable => {
                out.push_str("Nothing references this record; it can be deleted.\n");
            }
            DependentViews::Vehicles(vehicles) => {
                let _ = writeln!(out, "Delete blocked by {} vehicle(s):", vehicles.len());
                for v in vehicles {
                    let _ = writeln!(out, "  {}  {}", v.id, v.model);
                }
            }
            DependentViews::Instances(instances) => {
                let _ = writeln!(out, "Delete blocked by {} instance(s):", instances.len());
                for i in instances {
                    let _ = writeln!(out, "  {}  {}  {}", i.id, i.status, i.due_back_formatted);
                }
            }
            DependentViews::None => {}
        }
        out
    }
}

fn choice_lines(out: &mut String, title: &str, choices: &[Choice]) {
    let _ = writeln!(out, "{}:", title);
    if choices.is_empty() {
        out.push_str("  (none)\n");
    }
    for c in choices {
        let mark = if c.selected { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {} ({})", mark, c.label, c.id);
    }
}

impl Render for VehicleFormOptions {
    fn render_text(&self) -> String {
        let mut out = String::new();
        choice_lines(&mut out, "Manufacturers", &self.manufacturers);
        choice_lines(&mut out, "Vehicle types", &self.vehicle_types);
        out
    }
}

impl Render for InstanceFormOptions {
    fn render_text(&self) -> String {
        let mut out = String::new();
        choice_lines(&mut out, "Vehicles", &self.vehicles);
        out.push_str("Statuses:\n");
        for s in &self.statuses {
            let mark = if s.selected { "x" } else { " " };
            let _ = writeln!(out, "  [{}] {}", mark, s.status);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    Created,
    Existing,
    Updated,
    Deleted,
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReceipt {
    pub action: WriteAction,
    pub kind: EntityKind,
    pub id: EntityId,
    /// Absent once the record is gone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Render for WriteReceipt {
    fn render_text(&self) -> String {
        let verb = match self.action {
            WriteAction::Created => "Created",
            WriteAction::Existing => "Already exists:",
            WriteAction::Updated => "Updated",
            WriteAction::Deleted => "Deleted",
        };
        match &self.url {
            Some(url) => format!("{} {} {} ({})\n", verb, self.kind, self.id, url),
            None => format!("{} {} {}\n", verb, self.kind, self.id),
        }
    }
}

/// A refused write, rendered for the submitter instead of failing the process.
#[derive(Debug, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ErrorReport<'a> {
    ValidationFailed {
        kind: EntityKind,
        errors: &'a [FieldError],
        input: &'a FieldMap,
    },
    IntegrityViolation {
        kind: EntityKind,
        id: EntityId,
        dependents: &'a Dependents,
    },
}

impl<'a> ErrorReport<'a> {
    /// `None` for errors that should propagate to `main`.
    pub fn from_error(err: &'a CatalogError) -> Option<Self> {
        match err {
            CatalogError::ValidationFailed { kind, rejection } => Some(ErrorReport::ValidationFailed {
                kind: *kind,
                errors: &rejection.errors,
                input: &rejection.input,
            }),
            CatalogError::IntegrityViolation {
                kind,
                id,
                dependents,
            } => Some(ErrorReport::IntegrityViolation {
                kind: *kind,
                id: *id,
                dependents,
            }),
            _ => None,
        }
    }
}

fn field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Single(s) => s.clone(),
        FieldValue::Many(items) => items.join(", "),
    }
}

impl Render for ErrorReport<'_> {
    fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            ErrorReport::ValidationFailed {
                kind,
                errors,
                input,
            } => {
                let _ = writeln!(out, "Invalid {} input:", kind);
                for e in errors.iter() {
                    let _ = writeln!(out, "  {}: {}", e.field, e.message);
                }
                if !input.is_empty() {
                    out.push_str("\nSubmitted:\n");
                    for (key, value) in input.iter() {
                        let _ = writeln!(out, "  {} = {}", key, field_value(value));
                    }
                }
            }
            ErrorReport::IntegrityViolation {
                kind,
                id,
                dependents,
            } => {
                let _ = writeln!(
                    out,
                    "Cannot delete {} {}: still referenced by {} record(s)",
                    kind,
                    id,
                    dependents.len()
                );
                match dependents {
                    Dependents::Vehicles(vehicles) => {
                        for v in vehicles {
                            let _ = writeln!(out, "  vehicle {}  {}", v.id, v.model);
                        }
                    }
                    Dependents::Instances(instances) => {
                        for i in instances {
                            let _ = writeln!(out, "  vehicle instance {}  {}", i.id, i.status);
                        }
                    }
                }
            }
        }
        out
    }
}
