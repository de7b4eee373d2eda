//! Raw field maps from the write boundary
//!
//! Form bodies arrive as string keys mapped to either one string or a list
//! of strings. Nothing here is typed yet; the pipeline decodes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::escape::escape_html;

/// A posted value: one string, or several when the key was repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    fn map(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            FieldValue::Single(s) => FieldValue::Single(f(s)),
            FieldValue::Many(items) => FieldValue::Many(items.iter().map(|s| f(s)).collect()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Single(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Many(items)
    }
}

/// Coerce an optional scalar-or-sequence into a sequence.
///
/// Absent becomes empty, a scalar becomes a one-element sequence and a
/// sequence passes through unchanged.
pub fn normalize_many(value: Option<&FieldValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(FieldValue::Single(s)) => vec![s.clone()],
        Some(FieldValue::Many(items)) => items.clone(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Append a value; a repeated key turns into a sequence.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let merged = match self.0.remove(&key) {
            None => FieldValue::Single(value),
            Some(FieldValue::Single(first)) => FieldValue::Many(vec![first, value]),
            Some(FieldValue::Many(mut items)) => {
                items.push(value);
                FieldValue::Many(items)
            }
        };
        self.0.insert(key, merged);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Trimmed and HTML-escaped copy, safe to redisplay.
    pub fn sanitized(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.map(|s| escape_html(s.trim()))))
                .collect(),
        )
    }

    /// Parse `key=value` pairs; repeated keys accumulate into a sequence.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("empty field name in '{}'", pair));
            }
            map.push(key, value);
        }
        Ok(map)
    }
}
