use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use hemline_catalog::pricing::QualifyingItem;
use hemline_catalog::{GarmentType, PriceList, Service};
use hemline_core::repository::{
    GarmentTypeRepository, PriceListRepository, RepoResult, ServiceRepository,
};

/// In-memory store implementing every repository trait. Backs the test
/// suites and demo runs; the qualifying predicate is the same domain-model
/// code the engine relies on, so behavior matches the SQL store.
#[derive(Default)]
pub struct MemoryStore {
    services: RwLock<HashMap<Uuid, Service>>,
    garments: RwLock<HashMap<Uuid, GarmentType>>,
    price_lists: RwLock<HashMap<Uuid, PriceList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<T>(_: PoisonError<T>) -> Box<dyn std::error::Error + Send + Sync> {
    "store lock poisoned".into()
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn get_service(&self, id: Uuid) -> RepoResult<Option<Service>> {
        let services = self.services.read().map_err(lock_error)?;
        Ok(services.get(&id).filter(|s| !s.is_deleted()).cloned())
    }

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let services = self.services.read().map_err(lock_error)?;
        let mut out: Vec<Service> = services
            .values()
            .filter(|s| !s.is_deleted() && s.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn create_service(&self, service: &Service) -> RepoResult<()> {
        let mut services = self.services.write().map_err(lock_error)?;
        services.insert(service.id, service.clone());
        Ok(())
    }

    async fn update_service(&self, service: &Service) -> RepoResult<()> {
        let mut services = self.services.write().map_err(lock_error)?;
        if let Some(existing) = services.get_mut(&service.id) {
            if !existing.is_deleted() {
                let mut updated = service.clone();
                updated.updated_at = Utc::now();
                *existing = updated;
            }
        }
        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> RepoResult<bool> {
        let mut services = self.services.write().map_err(lock_error)?;
        match services.get_mut(&id) {
            Some(service) if !service.is_deleted() => {
                service.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_services(&self) -> RepoResult<u64> {
        let services = self.services.read().map_err(lock_error)?;
        Ok(services.values().filter(|s| !s.is_deleted()).count() as u64)
    }
}

#[async_trait]
impl GarmentTypeRepository for MemoryStore {
    async fn get_garment_type(&self, id: Uuid) -> RepoResult<Option<GarmentType>> {
        let garments = self.garments.read().map_err(lock_error)?;
        Ok(garments.get(&id).filter(|g| !g.is_deleted()).cloned())
    }

    async fn list_garment_types(&self) -> RepoResult<Vec<GarmentType>> {
        let garments = self.garments.read().map_err(lock_error)?;
        let mut out: Vec<GarmentType> = garments
            .values()
            .filter(|g| !g.is_deleted() && g.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn create_garment_type(&self, garment: &GarmentType) -> RepoResult<()> {
        let mut garments = self.garments.write().map_err(lock_error)?;
        garments.insert(garment.id, garment.clone());
        Ok(())
    }

    async fn update_garment_type(&self, garment: &GarmentType) -> RepoResult<()> {
        let mut garments = self.garments.write().map_err(lock_error)?;
        if let Some(existing) = garments.get_mut(&garment.id) {
            if !existing.is_deleted() {
                let mut updated = garment.clone();
                updated.updated_at = Utc::now();
                *existing = updated;
            }
        }
        Ok(())
    }

    async fn delete_garment_type(&self, id: Uuid) -> RepoResult<bool> {
        let mut garments = self.garments.write().map_err(lock_error)?;
        match garments.get_mut(&id) {
            Some(garment) if !garment.is_deleted() => {
                garment.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_garment_types(&self) -> RepoResult<u64> {
        let garments = self.garments.read().map_err(lock_error)?;
        Ok(garments.values().filter(|g| !g.is_deleted()).count() as u64)
    }

    async fn find_garment_type_by_name(&self, name: &str) -> RepoResult<Option<GarmentType>> {
        let garments = self.garments.read().map_err(lock_error)?;
        Ok(garments
            .values()
            .find(|g| !g.is_deleted() && g.name == name)
            .cloned())
    }
}

#[async_trait]
impl PriceListRepository for MemoryStore {
    async fn create_price_list(&self, list: &PriceList) -> RepoResult<()> {
        let mut lists = self.price_lists.write().map_err(lock_error)?;
        lists.insert(list.id, list.clone());
        Ok(())
    }

    async fn get_price_list(&self, id: Uuid) -> RepoResult<Option<PriceList>> {
        let lists = self.price_lists.read().map_err(lock_error)?;
        Ok(lists.get(&id).filter(|l| !l.is_deleted()).cloned())
    }

    async fn list_price_lists(&self) -> RepoResult<Vec<PriceList>> {
        let lists = self.price_lists.read().map_err(lock_error)?;
        let mut out: Vec<PriceList> = lists.values().filter(|l| !l.is_deleted()).cloned().collect();
        out.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn replace_price_list(&self, list: &PriceList) -> RepoResult<()> {
        // The single write lock is the transactional boundary here.
        let mut lists = self.price_lists.write().map_err(lock_error)?;
        if let Some(existing) = lists.get_mut(&list.id) {
            if !existing.is_deleted() {
                let mut updated = list.clone();
                updated.updated_at = Utc::now();
                *existing = updated;
            }
        }
        Ok(())
    }

    async fn delete_price_list(&self, id: Uuid) -> RepoResult<bool> {
        let mut lists = self.price_lists.write().map_err(lock_error)?;
        match lists.get_mut(&id) {
            Some(list) if !list.is_deleted() => {
                list.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_qualifying_items(
        &self,
        service_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> RepoResult<Vec<QualifyingItem>> {
        let lists = self.price_lists.read().map_err(lock_error)?;
        Ok(QualifyingItem::from_lists(lists.values(), service_id, as_of))
    }
}
