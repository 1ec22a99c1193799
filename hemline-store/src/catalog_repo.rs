use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use hemline_catalog::{GarmentType, Service};
use hemline_core::repository::{GarmentTypeRepository, RepoResult, ServiceRepository};

pub struct StoreServiceRepository {
    pool: PgPool,
}

impl StoreServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    default_duration_min: i32,
    base_price: rust_decimal::Decimal,
    is_active: bool,
    garment_type_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            name: row.name,
            description: row.description,
            default_duration_min: row.default_duration_min,
            base_price: row.base_price,
            is_active: row.is_active,
            garment_type_id: row.garment_type_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const SERVICE_COLUMNS: &str = "id_service AS id, name, description, default_duration_min, base_price, is_active, id_garment_type AS garment_type_id, created_at, updated_at, deleted_at";

#[async_trait]
impl ServiceRepository for StoreServiceRepository {
    async fn get_service(&self, id: Uuid) -> RepoResult<Option<Service>> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM cci_service WHERE id_service = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Service::from))
    }

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM cci_service WHERE deleted_at IS NULL AND is_active = TRUE ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn create_service(&self, service: &Service) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cci_service (id_service, name, description, default_duration_min, base_price, is_active, id_garment_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.default_duration_min)
        .bind(service.base_price)
        .bind(service.is_active)
        .bind(service.garment_type_id)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_service(&self, service: &Service) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE cci_service
            SET name = $1, description = $2, default_duration_min = $3, base_price = $4, is_active = $5, id_garment_type = $6, updated_at = NOW()
            WHERE id_service = $7 AND deleted_at IS NULL
            "#,
        )
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.default_duration_min)
        .bind(service.base_price)
        .bind(service.is_active)
        .bind(service.garment_type_id)
        .bind(service.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE cci_service SET deleted_at = NOW(), updated_at = NOW() WHERE id_service = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_services(&self) -> RepoResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cci_service WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }
}

pub struct StoreGarmentTypeRepository {
    pool: PgPool,
}

impl StoreGarmentTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GarmentTypeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<GarmentTypeRow> for GarmentType {
    fn from(row: GarmentTypeRow) -> Self {
        GarmentType {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const GARMENT_COLUMNS: &str =
    "id_garment_type AS id, name, description, is_active, created_at, updated_at, deleted_at";

#[async_trait]
impl GarmentTypeRepository for StoreGarmentTypeRepository {
    async fn get_garment_type(&self, id: Uuid) -> RepoResult<Option<GarmentType>> {
        let row = sqlx::query_as::<_, GarmentTypeRow>(&format!(
            "SELECT {GARMENT_COLUMNS} FROM cci_garment_type WHERE id_garment_type = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GarmentType::from))
    }

    async fn list_garment_types(&self) -> RepoResult<Vec<GarmentType>> {
        let rows = sqlx::query_as::<_, GarmentTypeRow>(&format!(
            "SELECT {GARMENT_COLUMNS} FROM cci_garment_type WHERE deleted_at IS NULL AND is_active = TRUE ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GarmentType::from).collect())
    }

    async fn create_garment_type(&self, garment: &GarmentType) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cci_garment_type (id_garment_type, name, description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(garment.id)
        .bind(&garment.name)
        .bind(&garment.description)
        .bind(garment.is_active)
        .bind(garment.created_at)
        .bind(garment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_garment_type(&self, garment: &GarmentType) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE cci_garment_type
            SET name = $1, description = $2, is_active = $3, updated_at = NOW()
            WHERE id_garment_type = $4 AND deleted_at IS NULL
            "#,
        )
        .bind(&garment.name)
        .bind(&garment.description)
        .bind(garment.is_active)
        .bind(garment.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_garment_type(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE cci_garment_type SET deleted_at = NOW(), updated_at = NOW() WHERE id_garment_type = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_garment_types(&self) -> RepoResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cci_garment_type WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }

    async fn find_garment_type_by_name(&self, name: &str) -> RepoResult<Option<GarmentType>> {
        let row = sqlx::query_as::<_, GarmentTypeRow>(&format!(
            "SELECT {GARMENT_COLUMNS} FROM cci_garment_type WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GarmentType::from))
    }
}
