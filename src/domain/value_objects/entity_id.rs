//! Entity identifier value object
//!
//! Every stored record is keyed by an opaque, store-assigned identifier.
//! Identifiers are ULIDs, so sorting by id is sorting by creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

/// Opaque unique identifier assigned when a record is first inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(Ulid);

impl EntityId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Parse an identifier supplied by the request boundary.
    pub fn parse(raw: &str) -> Result<Self, InvalidEntityId> {
        raw.parse()
    }
}

/// Error returned when a string is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid identifier")]
pub struct InvalidEntityId {
    pub raw: String,
}

impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|_| InvalidEntityId { raw: s.to_string() })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
