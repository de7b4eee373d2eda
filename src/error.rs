//! Error types for the catalog
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use thiserror::Error;

use crate::application::DuplicateQuery;
use crate::domain::ports::StoreError;
use crate::domain::services::Dependents;
use crate::domain::validation::Rejection;
use crate::domain::value_objects::{EntityId, EntityKind};

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures a catalog use case can report.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No live record under the requested identifier
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },

    /// Input refused by the write boundary; nothing was stored
    #[error("invalid {kind} input ({} field error(s))", .rejection.errors.len())]
    ValidationFailed {
        kind: EntityKind,
        rejection: Rejection,
    },

    /// Delete refused because other records still reference the target
    #[error("cannot delete {kind} {id}: still referenced by {} record(s)", .dependents.len())]
    IntegrityViolation {
        kind: EntityKind,
        id: EntityId,
        dependents: Dependents,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Process exit code when this error reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            CatalogError::NotFound { .. } => 2,
            _ => 1,
        }
    }

    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        CatalogError::NotFound { kind, id }
    }
}

impl From<tokio::task::JoinError> for CatalogError {
    fn from(err: tokio::task::JoinError) -> Self {
        CatalogError::Store(err.into())
    }
}

impl From<DuplicateQuery> for CatalogError {
    fn from(err: DuplicateQuery) -> Self {
        CatalogError::Store(StoreError::TaskFailed {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{FieldError, FieldMap};

    #[test]
    fn test_error_display_not_found() {
        let id = EntityId::generate();
        let err = CatalogError::not_found(EntityKind::VehicleType, id);
        assert_eq!(err.to_string(), format!("vehicle type not found: {}", id));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_display_validation_failed() {
        let rejection = Rejection::new(
            &FieldMap::new().with("dueBack", "not-a-date"),
            vec![FieldError::new("dueBack", "Invalid date")],
        );
        let err = CatalogError::ValidationFailed {
            kind: EntityKind::VehicleInstance,
            rejection,
        };
        assert_eq!(
            err.to_string(),
            "invalid vehicle instance input (1 field error(s))"
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: CatalogError = StoreError::TaskFailed {
            message: "cancelled".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "store task failed: cancelled");
    }
}
