use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hemline_catalog::pricing::QualifyingItem;
use hemline_catalog::{PriceList, PriceListItem};
use hemline_core::repository::{PriceListRepository, RepoResult};

pub struct PostgresPriceListRepository {
    pub pool: PgPool,
}

impl PostgresPriceListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_items(&self, list_id: Uuid) -> RepoResult<Vec<PriceListItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id_price_list_item AS id, id_service AS service_id, price FROM tcc_price_list_item WHERE id_price_list = $1 ORDER BY created_at",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PriceListItem::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct PriceListRow {
    id: Uuid,
    name: String,
    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
    is_active: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl PriceListRow {
    fn into_list(self, items: Vec<PriceListItem>) -> PriceList {
        PriceList {
            id: self.id,
            name: self.name,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            is_active: self.is_active,
            priority: self.priority,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    service_id: Uuid,
    price: rust_decimal::Decimal,
}

impl From<ItemRow> for PriceListItem {
    fn from(row: ItemRow) -> Self {
        PriceListItem {
            id: row.id,
            service_id: row.service_id,
            price: row.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QualifyingRow {
    price: rust_decimal::Decimal,
    priority: i32,
    price_list_id: Uuid,
    price_list_name: String,
    valid_from: DateTime<Utc>,
}

const LIST_COLUMNS: &str = "id_price_list AS id, name, valid_from, valid_to, is_active, priority, created_at, updated_at, deleted_at";

#[async_trait]
impl PriceListRepository for PostgresPriceListRepository {
    async fn create_price_list(&self, list: &PriceList) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tcc_price_list (id_price_list, name, valid_from, valid_to, is_active, priority, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(list.valid_from)
        .bind(list.valid_to)
        .bind(list.is_active)
        .bind(list.priority)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &list.items {
            sqlx::query(
                r#"
                INSERT INTO tcc_price_list_item (id_price_list_item, id_price_list, id_service, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(list.id)
            .bind(item.service_id)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_price_list(&self, id: Uuid) -> RepoResult<Option<PriceList>> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM tcc_price_list WHERE id_price_list = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.fetch_items(row.id).await?;
        Ok(Some(row.into_list(items)))
    }

    async fn list_price_lists(&self) -> RepoResult<Vec<PriceList>> {
        let rows = sqlx::query_as::<_, PriceListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM tcc_price_list WHERE deleted_at IS NULL ORDER BY priority DESC, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.fetch_items(row.id).await?;
            lists.push(row.into_list(items));
        }

        Ok(lists)
    }

    async fn replace_price_list(&self, list: &PriceList) -> RepoResult<()> {
        // Header update and full item replacement in one transaction, so a
        // concurrent resolution never reads a half-written item set.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE tcc_price_list
            SET name = $1, valid_from = $2, valid_to = $3, is_active = $4, priority = $5, updated_at = NOW()
            WHERE id_price_list = $6 AND deleted_at IS NULL
            "#,
        )
        .bind(&list.name)
        .bind(list.valid_from)
        .bind(list.valid_to)
        .bind(list.is_active)
        .bind(list.priority)
        .bind(list.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tcc_price_list_item WHERE id_price_list = $1")
            .bind(list.id)
            .execute(&mut *tx)
            .await?;

        for item in &list.items {
            sqlx::query(
                r#"
                INSERT INTO tcc_price_list_item (id_price_list_item, id_price_list, id_service, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(list.id)
            .bind(item.service_id)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_price_list(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE tcc_price_list SET deleted_at = NOW(), updated_at = NOW() WHERE id_price_list = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_qualifying_items(
        &self,
        service_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> RepoResult<Vec<QualifyingItem>> {
        let rows = sqlx::query_as::<_, QualifyingRow>(
            r#"
            SELECT i.price, l.priority, l.id_price_list AS price_list_id, l.name AS price_list_name, l.valid_from
            FROM tcc_price_list_item i
            JOIN tcc_price_list l ON l.id_price_list = i.id_price_list
            WHERE i.id_service = $1
              AND l.deleted_at IS NULL
              AND l.is_active = TRUE
              AND l.valid_from <= $2
              AND (l.valid_to IS NULL OR l.valid_to >= $2)
            ORDER BY l.priority DESC, l.valid_from DESC, l.id_price_list ASC
            "#,
        )
        .bind(service_id)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| QualifyingItem {
                price: row.price,
                priority: row.priority,
                price_list_id: row.price_list_id,
                price_list_name: row.price_list_name,
                valid_from: row.valid_from,
            })
            .collect())
    }
}
