//! Results of catalog write operations

use serde::Serialize;

/// Creating a record whose natural key is taken hands back the holder of
/// that key instead of storing a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum CreateOutcome<D> {
    Created(D),
    Existing(D),
}

impl<D> CreateOutcome<D> {
    pub fn record(&self) -> &D {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> D {
        match self {
            CreateOutcome::Created(record) | CreateOutcome::Existing(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }

    pub fn map<U>(self, f: impl FnOnce(D) -> U) -> CreateOutcome<U> {
        match self {
            CreateOutcome::Created(record) => CreateOutcome::Created(f(record)),
            CreateOutcome::Existing(record) => CreateOutcome::Existing(f(record)),
        }
    }
}
