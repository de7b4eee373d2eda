//! JSON File Store
//!
//! Persists each collection as a JSON array at `<data_dir>/<collection>.json`.
//! Writes hold an exclusive lock on `<collection>.lock`, re-read the file,
//! apply one change and replace the file atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;

use super::select;
use crate::domain::entities::Document;
use crate::domain::ports::{Repository, SortOrder, StoreError, StoreResult};
use crate::domain::value_objects::EntityId;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection_path<D: Document>(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", D::KIND.collection()))
    }

    fn lock_path<D: Document>(&self) -> PathBuf {
        self.collection_path::<D>().with_extension("lock")
    }

    fn load<D: Document>(&self) -> StoreResult<BTreeMap<EntityId, D>> {
        let path = self.collection_path::<D>();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let docs: Vec<D> =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(docs.into_iter().map(|d| (d.id(), d)).collect())
    }

    fn save<D: Document>(&self, docs: &BTreeMap<EntityId, D>) -> StoreResult<()> {
        let records: Vec<&D> = docs.values().collect();
        let content =
            serde_json::to_string_pretty(&records).map_err(|e| StoreError::Serialization {
                message: e.to_string(),
            })?;

        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.collection_path::<D>())
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Run `change` against the current collection under the write lock.
    /// The collection is written back only when `change` reports a mutation.
    fn locked<D, R>(
        &self,
        change: impl FnOnce(&mut BTreeMap<EntityId, D>) -> (R, bool),
    ) -> StoreResult<R>
    where
        D: Document,
    {
        let lock_file = fs::File::create(self.lock_path::<D>())?;
        lock_file.lock_exclusive()?;

        let result = self.load::<D>().and_then(|mut docs| {
            let (value, dirty) = change(&mut docs);
            if dirty {
                self.save(&docs)?;
            }
            Ok(value)
        });

        let _ = lock_file.unlock();
        result
    }

    async fn blocking<R, F>(&self, task: F) -> StoreResult<R>
    where
        R: Send + 'static,
        F: FnOnce(JsonFileStore) -> StoreResult<R> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || task(store)).await?
    }
}

#[async_trait]
impl<D: Document> Repository<D> for JsonFileStore {
    async fn find(&self, filter: &D::Filter, sort: Option<SortOrder>) -> StoreResult<Vec<D>> {
        let filter = filter.clone();
        self.blocking(move |store| Ok(select(&store.load::<D>()?, &filter, sort)))
            .await
    }

    async fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<D>> {
        let id = *id;
        self.blocking(move |store| Ok(store.load::<D>()?.remove(&id)))
            .await
    }

    async fn insert(&self, draft: D::Draft) -> StoreResult<D> {
        self.blocking(move |store| {
            store.locked(|docs: &mut BTreeMap<EntityId, D>| {
                let doc = D::from_draft(EntityId::generate(), draft);
                docs.insert(doc.id(), doc.clone());
                (doc, true)
            })
        })
        .await
    }

    async fn replace(&self, id: &EntityId, draft: D::Draft) -> StoreResult<Option<D>> {
        let id = *id;
        self.blocking(move |store| {
            store.locked(|docs: &mut BTreeMap<EntityId, D>| match docs.get_mut(&id) {
                Some(slot) => {
                    *slot = D::from_draft(id, draft);
                    (Some(slot.clone()), true)
                }
                None => (None, false),
            })
        })
        .await
    }

    async fn delete(&self, id: &EntityId) -> StoreResult<bool> {
        let id = *id;
        self.blocking(move |store| {
            store.locked(|docs: &mut BTreeMap<EntityId, D>| {
                let removed = docs.remove(&id).is_some();
                (removed, removed)
            })
        })
        .await
    }

    async fn count_where(&self, filter: &D::Filter) -> StoreResult<usize> {
        let filter = filter.clone();
        self.blocking(move |store| {
            Ok(store
                .load::<D>()?
                .values()
                .filter(|d| d.matches(&filter))
                .count())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Manufacturer, ManufacturerDraft, ManufacturerFilter, Vehicle, VehicleDraft, VehicleFilter,
    };
    use tempfile::tempdir;

    fn ford() -> ManufacturerDraft {
        ManufacturerDraft {
            name: "Ford".to_string(),
            country: Some("USA".to_string()),
        }
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let repo: &dyn Repository<Manufacturer> = &store;
        let saved = repo.insert(ford()).await.unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        let repo: &dyn Repository<Manufacturer> = &reopened;
        assert_eq!(repo.find_by_id(&saved.id).await.unwrap(), Some(saved));
        assert!(dir.path().join("manufacturers.json").exists());
        assert!(dir.path().join("manufacturers.lock").exists());
    }

    #[tokio::test]
    async fn collections_are_separate_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let makers: &dyn Repository<Manufacturer> = &store;
        let vehicles: &dyn Repository<Vehicle> = &store;

        let make = makers.insert(ford()).await.unwrap();
        vehicles
            .insert(VehicleDraft {
                manufacturer: make.id,
                model: "Focus".to_string(),
                vehicle_types: vec![],
                price: Some(18500.0),
            })
            .await
            .unwrap();

        assert!(dir.path().join("vehicles.json").exists());
        let count = vehicles
            .count_where(&VehicleFilter::Manufacturer(make.id))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn replace_and_delete_are_persisted() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let repo: &dyn Repository<Manufacturer> = &store;
        let saved = repo.insert(ford()).await.unwrap();

        let replaced = repo
            .replace(
                &saved.id,
                ManufacturerDraft {
                    name: "Ford".to_string(),
                    country: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.country, None);

        assert!(repo.delete(&saved.id).await.unwrap());
        let all = repo.find(&ManufacturerFilter::All, None).await.unwrap();
        assert!(all.is_empty());
        assert!(!repo.delete(&saved.id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).unwrap();
        let repo: &dyn Repository<Manufacturer> = &store;
        assert!(repo.find(&ManufacturerFilter::All, None).await.unwrap().is_empty());
        assert!(store.data_dir().exists());
    }

    #[tokio::test]
    async fn corrupted_collection_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("manufacturers.json"), "{ not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let repo: &dyn Repository<Manufacturer> = &store;

        let err = repo.find(&ManufacturerFilter::All, None).await.unwrap_err();
        match err {
            StoreError::Corrupted { path, .. } => {
                assert!(path.ends_with("manufacturers.json"));
            }
            other => panic!("expected Corrupted, got {other:?}"),
        }
    }
}
