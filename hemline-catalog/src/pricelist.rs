use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One override entry inside a price list, tying a service to a price.
///
/// Items are plain values owned by their list; nothing points back at the
/// parent. Code that needs the owning list passes it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceListItem {
    pub id: Uuid,
    pub service_id: Uuid,
    pub price: Decimal,
}

impl PriceListItem {
    pub fn new(service_id: Uuid, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_id,
            price,
        }
    }
}

/// A named, time-bounded, prioritized set of per-service price overrides.
///
/// Several lists may be active with overlapping windows; `priority`
/// (higher wins) disambiguates at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceList {
    pub id: Uuid,
    pub name: String,
    pub valid_from: DateTime<Utc>,
    /// None = open-ended
    pub valid_to: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub priority: i32,
    pub items: Vec<PriceListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PriceListError {
    #[error("valid_to {valid_to} precedes valid_from {valid_from}")]
    InvertedWindow {
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    },

    #[error("duplicate item for service {0}")]
    DuplicateService(Uuid),
}

impl PriceList {
    pub fn new(
        name: String,
        valid_from: DateTime<Utc>,
        valid_to: Option<DateTime<Utc>>,
        is_active: bool,
        priority: i32,
    ) -> Result<Self, PriceListError> {
        validate_window(valid_from, valid_to)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            valid_from,
            valid_to,
            is_active,
            priority,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    pub fn add_item(&mut self, item: PriceListItem) -> Result<(), PriceListError> {
        if self.items.iter().any(|i| i.service_id == item.service_id) {
            return Err(PriceListError::DuplicateService(item.service_id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Full-replacement of the item set. The previous items are discarded.
    pub fn replace_items(&mut self, items: Vec<PriceListItem>) -> Result<(), PriceListError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.service_id) {
                return Err(PriceListError::DuplicateService(item.service_id));
            }
        }
        self.items = items;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the validity window contains `as_of`. Both endpoints are
    /// inclusive; a missing `valid_to` never closes the window.
    pub fn is_valid_at(&self, as_of: DateTime<Utc>) -> bool {
        self.valid_from <= as_of && self.valid_to.map_or(true, |to| to >= as_of)
    }

    /// Whether the list can contribute overrides at `as_of`.
    pub fn qualifies_at(&self, as_of: DateTime<Utc>) -> bool {
        self.is_active && !self.is_deleted() && self.is_valid_at(as_of)
    }

    pub fn item_for(&self, service_id: Uuid) -> Option<&PriceListItem> {
        self.items.iter().find(|i| i.service_id == service_id)
    }
}

pub fn validate_window(
    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
) -> Result<(), PriceListError> {
    match valid_to {
        Some(to) if to < valid_from => Err(PriceListError::InvertedWindow { valid_from, valid_to: to }),
        _ => Ok(()),
    }
}
