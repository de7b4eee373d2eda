//! Repository port - typed CRUD over one catalog collection
//!
//! Operations are independent of each other and carry no cross-entity
//! knowledge. Every successful insert/replace/delete mutates exactly one
//! stored record; there are no cascades.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{Document, Manufacturer, Vehicle, VehicleInstance, VehicleType};
use crate::domain::value_objects::EntityId;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the backing store itself.
///
/// These are fatal for the current request and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("collection file corrupted: {path}\n  → Details: {message}")]
    Corrupted { path: PathBuf, message: String },

    #[error("failed to serialize collection: {message}")]
    Serialization { message: String },

    #[error("store task failed: {message}")]
    TaskFailed { message: String },
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::TaskFailed {
            message: err.to_string(),
        }
    }
}

/// Sort direction over a document's natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[async_trait]
pub trait Repository<D: Document>: Send + Sync {
    /// Documents matching `filter`. Without a sort they come back in
    /// identifier (creation) order.
    async fn find(&self, filter: &D::Filter, sort: Option<SortOrder>) -> StoreResult<Vec<D>>;

    /// `Ok(None)` is the not-found signal at this layer.
    async fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<D>>;

    /// Store a new record under a freshly assigned identifier.
    async fn insert(&self, draft: D::Draft) -> StoreResult<D>;

    /// Replace the whole record stored under `id`, keeping the identifier.
    async fn replace(&self, id: &EntityId, draft: D::Draft) -> StoreResult<Option<D>>;

    /// Physically remove the record. `Ok(false)` when nothing was stored.
    async fn delete(&self, id: &EntityId) -> StoreResult<bool>;

    async fn count_where(&self, filter: &D::Filter) -> StoreResult<usize>;
}

/// One repository per collection, shared across requests.
#[derive(Clone)]
pub struct Repositories {
    pub manufacturers: Arc<dyn Repository<Manufacturer>>,
    pub vehicle_types: Arc<dyn Repository<VehicleType>>,
    pub vehicles: Arc<dyn Repository<Vehicle>>,
    pub instances: Arc<dyn Repository<VehicleInstance>>,
}

impl Repositories {
    /// Use a single store that serves all four collections.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: Repository<Manufacturer>
            + Repository<VehicleType>
            + Repository<Vehicle>
            + Repository<VehicleInstance>
            + 'static,
    {
        Self {
            manufacturers: store.clone(),
            vehicle_types: store.clone(),
            vehicles: store.clone(),
            instances: store,
        }
    }
}
