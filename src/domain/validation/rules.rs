//! Field rules and the staged pipeline that applies them
//!
//! Stages run in a fixed order over every rule:
//! 1. presence / length
//! 2. format
//! 3. multi-value normalization
//! 4. sanitization
//!
//! Violations accumulate across all fields; nothing short-circuits.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use super::escape::escape_html;
use super::fields::{normalize_many, FieldMap, FieldValue};
use crate::domain::value_objects::EntityId;

/// One rejected rule, reported against the field name the caller used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Presence,
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// At least this many characters after trimming.
    MinLength(usize),
    /// ASCII letters and digits only.
    Alphanumeric,
    /// `YYYY-MM-DD`, or an ISO-8601 / RFC 3339 timestamp.
    IsoDate,
    NonNegativeNumber,
    Integer,
    Identifier,
    OneOf(&'static [&'static str]),
}

impl Check {
    fn stage(&self) -> Stage {
        match self {
            Check::MinLength(_) => Stage::Presence,
            _ => Stage::Format,
        }
    }

    fn passes(&self, value: &str) -> bool {
        match self {
            Check::MinLength(min) => value.chars().count() >= *min,
            Check::Alphanumeric => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            Check::IsoDate => parse_iso_date(value).is_some(),
            Check::NonNegativeNumber => value
                .parse::<f64>()
                .map(|n| n.is_finite() && n >= 0.0)
                .unwrap_or(false),
            Check::Integer => value.parse::<i32>().is_ok(),
            Check::Identifier => EntityId::parse(value).is_ok(),
            Check::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

/// Parse the date formats the write boundary accepts.
///
/// A bare calendar date means midnight UTC.
pub fn parse_iso_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    aliases: &'static [&'static str],
    optional: bool,
    multi: bool,
    checks: Vec<(Check, &'static str)>,
}

impl FieldRule {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            aliases: &[],
            optional: false,
            multi: false,
            checks: Vec::new(),
        }
    }

    /// An empty value counts as absent and skips every check.
    pub fn optional(field: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::required(field)
        }
    }

    /// Scalar-or-sequence field; checks apply to each element.
    pub fn many(field: &'static str) -> Self {
        Self {
            optional: true,
            multi: true,
            ..Self::required(field)
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn check(mut self, check: Check, message: &'static str) -> Self {
        self.checks.push((check, message));
        self
    }

    fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.field).chain(self.aliases.iter().copied())
    }
}

/// A field after trimming, normalization and escaping.
#[derive(Debug, Clone)]
struct CleanValue {
    key: String,
    trimmed: Vec<String>,
    escaped: Vec<String>,
}

/// Pipeline output for fields that survived the shape check.
#[derive(Debug, Clone, Default)]
pub struct Cleaned {
    fields: BTreeMap<&'static str, CleanValue>,
}

impl Cleaned {
    /// Key the caller used for `field`, or the canonical name if absent.
    pub fn key(&self, field: &'static str) -> String {
        self.fields
            .get(field)
            .map(|v| v.key.clone())
            .unwrap_or_else(|| field.to_string())
    }

    /// Trimmed value of a single-valued field. Empty counts as absent.
    pub fn value(&self, field: &'static str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|v| v.trimmed.first())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Escaped value of a free-text field. Empty counts as absent.
    pub fn text(&self, field: &'static str) -> Option<String> {
        self.fields
            .get(field)
            .and_then(|v| v.escaped.first())
            .filter(|s| !s.is_empty())
            .cloned()
    }

    /// Trimmed elements of a multi-valued field.
    pub fn many(&self, field: &'static str) -> &[String] {
        self.fields
            .get(field)
            .map(|v| v.trimmed.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Vec<FieldRule>,
}

impl Pipeline {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Run every stage. Errors come back in stage order, then rule order.
    pub fn run(&self, input: &FieldMap) -> (Cleaned, Vec<FieldError>) {
        let mut errors = Vec::new();
        let mut resolved: Vec<(&FieldRule, String, Vec<String>)> = Vec::new();

        for rule in &self.rules {
            let found = rule
                .keys()
                .find_map(|key| input.get(key).map(|value| (key, value)));
            let (key, value) = match found {
                Some((key, value)) => (key.to_string(), Some(value)),
                None => (rule.field.to_string(), None),
            };

            // Normalization: multi fields always become a sequence, and a
            // sequence posted for a scalar field is a malformed shape.
            let values = if rule.multi {
                normalize_many(value)
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            } else {
                match value {
                    Some(FieldValue::Many(_)) => {
                        errors.push(FieldError::new(
                            key.clone(),
                            format!("{} must be a single value.", rule.field),
                        ));
                        continue;
                    }
                    Some(FieldValue::Single(s)) => vec![s.trim().to_string()],
                    None => vec![String::new()],
                }
            };
            resolved.push((rule, key, values));
        }

        for stage in [Stage::Presence, Stage::Format] {
            for (rule, key, values) in &resolved {
                let is_empty = values.iter().all(String::is_empty);
                if is_empty && rule.optional {
                    continue;
                }
                for (check, message) in &rule.checks {
                    if check.stage() != stage {
                        continue;
                    }
                    // Emptiness is the presence stage's concern.
                    if stage == Stage::Format && is_empty {
                        continue;
                    }
                    if values.iter().any(|v| !check.passes(v)) {
                        errors.push(FieldError::new(key.clone(), *message));
                    }
                }
            }
        }

        let fields = resolved
            .into_iter()
            .map(|(rule, key, trimmed)| {
                let escaped = trimmed.iter().map(|s| escape_html(s)).collect();
                (
                    rule.field,
                    CleanValue {
                        key,
                        trimmed,
                        escaped,
                    },
                )
            })
            .collect();

        (Cleaned { fields }, errors)
    }
}
