use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use hemline_catalog::pricing::QualifyingItem;
use hemline_catalog::{GarmentType, PriceList, Service};

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for service catalog access.
///
/// Soft-deleted rows are filtered out at this boundary; `Ok(None)` from a
/// getter means "no such row" and store failures come back as errors.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn get_service(&self, id: Uuid) -> RepoResult<Option<Service>>;

    /// Active, non-deleted services.
    async fn list_services(&self) -> RepoResult<Vec<Service>>;

    async fn create_service(&self, service: &Service) -> RepoResult<()>;

    async fn update_service(&self, service: &Service) -> RepoResult<()>;

    /// Soft delete. Returns false when the id did not match a live row.
    async fn delete_service(&self, id: Uuid) -> RepoResult<bool>;

    async fn count_services(&self) -> RepoResult<u64>;
}

/// Repository trait for garment type access.
#[async_trait]
pub trait GarmentTypeRepository: Send + Sync {
    async fn get_garment_type(&self, id: Uuid) -> RepoResult<Option<GarmentType>>;

    async fn list_garment_types(&self) -> RepoResult<Vec<GarmentType>>;

    async fn create_garment_type(&self, garment: &GarmentType) -> RepoResult<()>;

    async fn update_garment_type(&self, garment: &GarmentType) -> RepoResult<()>;

    async fn delete_garment_type(&self, id: Uuid) -> RepoResult<bool>;

    async fn count_garment_types(&self) -> RepoResult<u64>;

    async fn find_garment_type_by_name(&self, name: &str) -> RepoResult<Option<GarmentType>>;
}

/// Repository trait for price list aggregates.
#[async_trait]
pub trait PriceListRepository: Send + Sync {
    async fn create_price_list(&self, list: &PriceList) -> RepoResult<()>;

    async fn get_price_list(&self, id: Uuid) -> RepoResult<Option<PriceList>>;

    /// All non-deleted lists, items included.
    async fn list_price_lists(&self) -> RepoResult<Vec<PriceList>>;

    /// Persist updated header fields and the full replacement item set.
    /// Implementations must apply the whole write atomically so a
    /// concurrent resolution never reads a torn item set.
    async fn replace_price_list(&self, list: &PriceList) -> RepoResult<()>;

    /// Soft delete. Returns false when the id did not match a live row.
    async fn delete_price_list(&self, id: Uuid) -> RepoResult<bool>;

    /// Overrides for `service_id` whose owning list is active, non-deleted
    /// and valid at `as_of`.
    async fn find_qualifying_items(
        &self,
        service_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> RepoResult<Vec<QualifyingItem>>;
}
