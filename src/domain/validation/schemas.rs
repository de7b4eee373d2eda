//! Per-entity field rules and draft decoding

use super::rules::{parse_iso_date, Check, Cleaned, FieldError, FieldRule, Pipeline};
use super::{FieldMap, Rejection, Validated};
use crate::domain::entities::{
    ManufacturerDraft, VehicleDraft, VehicleInstanceDraft, VehicleTypeDraft,
};
use crate::domain::value_objects::{EntityId, InstanceStatus};

const STATUS_VALUES: &[&str] = &["Available", "Loaned", "Reserved", "Maintenance"];

/// Switches that tighten the default rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Manufacturer names must be alphanumeric.
    pub strict_names: bool,
}

fn run<D>(
    rules: Vec<FieldRule>,
    input: &FieldMap,
    decode: impl FnOnce(&Cleaned) -> Result<D, FieldError>,
) -> Validated<D> {
    let (cleaned, errors) = Pipeline::new(rules).run(input);
    if !errors.is_empty() {
        return Validated::Invalid(Rejection::new(input, errors));
    }
    match decode(&cleaned) {
        Ok(draft) => Validated::Valid(draft),
        Err(err) => Validated::Invalid(Rejection::new(input, vec![err])),
    }
}

fn required_text(cleaned: &Cleaned, field: &'static str) -> Result<String, FieldError> {
    cleaned
        .text(field)
        .ok_or_else(|| FieldError::new(cleaned.key(field), format!("{} is required.", field)))
}

fn parse_id(cleaned: &Cleaned, field: &'static str, raw: &str) -> Result<EntityId, FieldError> {
    EntityId::parse(raw).map_err(|e| FieldError::new(cleaned.key(field), e.to_string()))
}

fn required_id(cleaned: &Cleaned, field: &'static str) -> Result<EntityId, FieldError> {
    let raw = cleaned
        .value(field)
        .ok_or_else(|| FieldError::new(cleaned.key(field), format!("{} is required.", field)))?;
    parse_id(cleaned, field, raw)
}

pub fn validate_manufacturer(
    input: &FieldMap,
    options: &ValidationOptions,
) -> Validated<ManufacturerDraft> {
    let mut name = FieldRule::required("name")
        .aliases(&["manufacturer"])
        .check(Check::MinLength(2), "Manufacturer name must be specified.");
    if options.strict_names {
        name = name.check(
            Check::Alphanumeric,
            "Manufacturer name has non-alphanumeric characters.",
        );
    }
    let rules = vec![
        name,
        FieldRule::optional("country")
            .check(Check::MinLength(2), "Country must be at least 2 characters.")
            .check(Check::Alphanumeric, "Country has non-alphanumeric characters."),
    ];

    run(rules, input, |cleaned| {
        Ok(ManufacturerDraft {
            name: required_text(cleaned, "name")?,
            country: cleaned.text("country"),
        })
    })
}

pub fn validate_vehicle_type(input: &FieldMap) -> Validated<VehicleTypeDraft> {
    let rules = vec![
        FieldRule::required("name").check(Check::MinLength(2), "Vehicle type name required."),
        FieldRule::optional("description").check(
            Check::MinLength(3),
            "Description must be at least 3 characters.",
        ),
    ];

    run(rules, input, |cleaned| {
        Ok(VehicleTypeDraft {
            name: required_text(cleaned, "name")?,
            description: cleaned.text("description"),
        })
    })
}

pub fn validate_vehicle(input: &FieldMap) -> Validated<VehicleDraft> {
    let rules = vec![
        FieldRule::required("model").check(Check::MinLength(1), "Model must not be empty."),
        FieldRule::required("manufacturer")
            .aliases(&["make"])
            .check(Check::MinLength(1), "Manufacturer must not be empty.")
            .check(Check::Identifier, "Manufacturer reference is malformed."),
        FieldRule::optional("price").check(
            Check::NonNegativeNumber,
            "Price must be a non-negative number.",
        ),
        FieldRule::many("vehicle_types")
            .aliases(&["vehicleType", "vehicletype"])
            .check(Check::Identifier, "Vehicle type reference is malformed."),
    ];

    run(rules, input, |cleaned| {
        let vehicle_types = cleaned
            .many("vehicle_types")
            .iter()
            .map(|raw| parse_id(cleaned, "vehicle_types", raw))
            .collect::<Result<Vec<_>, _>>()?;
        let price = match cleaned.value("price") {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                FieldError::new(cleaned.key("price"), "Price must be a non-negative number.")
            })?),
            None => None,
        };

        Ok(VehicleDraft {
            manufacturer: required_id(cleaned, "manufacturer")?,
            model: required_text(cleaned, "model")?,
            vehicle_types: dedup(vehicle_types),
            price,
        })
    })
}

pub fn validate_vehicle_instance(input: &FieldMap) -> Validated<VehicleInstanceDraft> {
    let rules = vec![
        FieldRule::required("vehicle")
            .check(Check::MinLength(1), "Vehicle must be specified.")
            .check(Check::Identifier, "Vehicle reference is malformed."),
        FieldRule::optional("status").check(
            Check::OneOf(STATUS_VALUES),
            "Status must be one of Available, Loaned, Reserved, Maintenance.",
        ),
        FieldRule::optional("year").check(Check::Integer, "Year must be a whole number."),
        FieldRule::optional("customer"),
        FieldRule::optional("due_back")
            .aliases(&["dueBack"])
            .check(Check::IsoDate, "Invalid date"),
    ];

    run(rules, input, |cleaned| {
        let status = match cleaned.value("status") {
            Some(raw) => raw
                .parse::<InstanceStatus>()
                .map_err(|e| FieldError::new(cleaned.key("status"), e.to_string()))?,
            None => InstanceStatus::default(),
        };
        let year = match cleaned.value("year") {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                FieldError::new(cleaned.key("year"), "Year must be a whole number.")
            })?),
            None => None,
        };
        let due_back = match cleaned.value("due_back") {
            Some(raw) => Some(
                parse_iso_date(raw)
                    .ok_or_else(|| FieldError::new(cleaned.key("due_back"), "Invalid date"))?,
            ),
            None => None,
        };

        Ok(VehicleInstanceDraft {
            vehicle: required_id(cleaned, "vehicle")?,
            status,
            year,
            customer: cleaned.text("customer"),
            due_back,
        })
    })
}

/// Keep first occurrence order; a type listed twice is still one membership.
fn dedup(ids: Vec<EntityId>) -> Vec<EntityId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
