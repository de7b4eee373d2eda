//! In-memory store
//!
//! Each collection sits behind its own `RwLock`; there is no locking across
//! collections or across calls.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::select;
use crate::domain::entities::{Document, Manufacturer, Vehicle, VehicleInstance, VehicleType};
use crate::domain::ports::{Repository, SortOrder, StoreResult};
use crate::domain::value_objects::EntityId;

#[derive(Debug)]
struct Collection<D> {
    docs: RwLock<BTreeMap<EntityId, D>>,
}

impl<D> Default for Collection<D> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<D: Document> Collection<D> {
    async fn find(&self, filter: &D::Filter, sort: Option<SortOrder>) -> Vec<D> {
        select(&*self.docs.read().await, filter, sort)
    }

    async fn find_by_id(&self, id: &EntityId) -> Option<D> {
        self.docs.read().await.get(id).cloned()
    }

    async fn insert(&self, draft: D::Draft) -> D {
        let doc = D::from_draft(EntityId::generate(), draft);
        self.docs.write().await.insert(doc.id(), doc.clone());
        doc
    }

    async fn replace(&self, id: &EntityId, draft: D::Draft) -> Option<D> {
        let mut docs = self.docs.write().await;
        let slot = docs.get_mut(id)?;
        *slot = D::from_draft(*id, draft);
        Some(slot.clone())
    }

    async fn delete(&self, id: &EntityId) -> bool {
        self.docs.write().await.remove(id).is_some()
    }

    async fn count_where(&self, filter: &D::Filter) -> usize {
        self.docs
            .read()
            .await
            .values()
            .filter(|d| d.matches(filter))
            .count()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    manufacturers: Collection<Manufacturer>,
    vehicle_types: Collection<VehicleType>,
    vehicles: Collection<Vehicle>,
    instances: Collection<VehicleInstance>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! memory_repository {
    ($doc:ty, $field:ident) => {
        #[async_trait]
        impl Repository<$doc> for MemoryStore {
            async fn find(
                &self,
                filter: &<$doc as Document>::Filter,
                sort: Option<SortOrder>,
            ) -> StoreResult<Vec<$doc>> {
                Ok(self.$field.find(filter, sort).await)
            }

            async fn find_by_id(&self, id: &EntityId) -> StoreResult<Option<$doc>> {
                Ok(self.$field.find_by_id(id).await)
            }

            async fn insert(&self, draft: <$doc as Document>::Draft) -> StoreResult<$doc> {
                Ok(self.$field.insert(draft).await)
            }

            async fn replace(
                &self,
                id: &EntityId,
                draft: <$doc as Document>::Draft,
            ) -> StoreResult<Option<$doc>> {
                Ok(self.$field.replace(id, draft).await)
            }

            async fn delete(&self, id: &EntityId) -> StoreResult<bool> {
                Ok(self.$field.delete(id).await)
            }

            async fn count_where(&self, filter: &<$doc as Document>::Filter) -> StoreResult<usize> {
                Ok(self.$field.count_where(filter).await)
            }
        }
    };
}

memory_repository!(Manufacturer, manufacturers);
memory_repository!(VehicleType, vehicle_types);
memory_repository!(Vehicle, vehicles);
memory_repository!(VehicleInstance, instances);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ManufacturerDraft, ManufacturerFilter};

    fn draft(name: &str) -> ManufacturerDraft {
        ManufacturerDraft {
            name: name.to_string(),
            country: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let repo: &dyn Repository<Manufacturer> = &store;
        let a = repo.insert(draft("Ford")).await.unwrap();
        let b = repo.insert(draft("Audi")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.find_by_id(&a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn find_sorts_by_natural_key() {
        let store = MemoryStore::new();
        let repo: &dyn Repository<Manufacturer> = &store;
        for name in ["Ford", "Audi", "Kia"] {
            repo.insert(draft(name)).await.unwrap();
        }

        let asc = repo
            .find(&ManufacturerFilter::All, Some(SortOrder::Ascending))
            .await
            .unwrap();
        let names: Vec<_> = asc.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Audi", "Ford", "Kia"]);

        let desc = repo
            .find(&ManufacturerFilter::All, Some(SortOrder::Descending))
            .await
            .unwrap();
        assert_eq!(desc[0].name, "Kia");
    }

    #[tokio::test]
    async fn replace_keeps_identifier() {
        let store = MemoryStore::new();
        let repo: &dyn Repository<Manufacturer> = &store;
        let ford = repo.insert(draft("Ford")).await.unwrap();

        let renamed = repo.replace(&ford.id, draft("Ford Motor")).await.unwrap().unwrap();
        assert_eq!(renamed.id, ford.id);
        assert_eq!(renamed.name, "Ford Motor");

        let missing = repo.replace(&EntityId::generate(), draft("x")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_and_count() {
        let store = MemoryStore::new();
        let repo: &dyn Repository<Manufacturer> = &store;
        let ford = repo.insert(draft("Ford")).await.unwrap();
        let filter = ManufacturerFilter::Name("Ford".to_string());
        assert_eq!(repo.count_where(&filter).await.unwrap(), 1);

        assert!(repo.delete(&ford.id).await.unwrap());
        assert!(!repo.delete(&ford.id).await.unwrap());
        assert_eq!(repo.count_where(&filter).await.unwrap(), 0);
    }
}
