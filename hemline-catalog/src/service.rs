use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billable garment-care service (hemming, tapering, dry cleaning, ...)
///
/// `base_price` is what the service costs when no price list overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub default_duration_min: i32,
    pub base_price: Decimal,
    pub is_active: bool,
    pub garment_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Service {
    pub fn new(
        name: String,
        description: Option<String>,
        default_duration_min: i32,
        base_price: Decimal,
        garment_type_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            default_duration_min,
            base_price,
            is_active: true,
            garment_type_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
