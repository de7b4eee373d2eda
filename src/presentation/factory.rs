//! Service Factory
//!
//! Wires the configured store adapter into a `CatalogService`.

use std::sync::Arc;

use tracing::debug;

use crate::application::CatalogService;
use crate::config::{Config, StoreBackend};
use crate::domain::ports::{Repositories, StoreResult};
use crate::infrastructure::{JsonFileStore, MemoryStore};

/// Repositories for the configured backend.
pub fn build_repositories(config: &Config) -> StoreResult<Repositories> {
    match config.store.backend {
        StoreBackend::Memory => {
            debug!("using in-memory store");
            Ok(Repositories::from_store(Arc::new(MemoryStore::new())))
        }
        StoreBackend::Json => {
            let store = JsonFileStore::open(&config.store.data_dir)?;
            debug!(data_dir = %store.data_dir().display(), "using JSON file store");
            Ok(Repositories::from_store(Arc::new(store)))
        }
    }
}

/// A catalog service with every dependency injected.
pub fn build_service(config: &Config) -> StoreResult<CatalogService> {
    let repos = build_repositories(config)?;
    Ok(CatalogService::with_options(repos, config.validation_options()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        let service = build_service(&config).unwrap();
        assert_eq!(service.summary().await.unwrap().manufacturers, 0);
    }

    #[tokio::test]
    async fn json_backend_creates_data_dir() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");
        let mut config = Config::default();
        config.store.data_dir = data_dir.clone();
        let service = build_service(&config).unwrap();
        assert!(data_dir.is_dir());
        assert!(service.list_vehicles().await.unwrap().is_empty());
    }
}
