use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::pricelist::PriceList;
use crate::service::Service;

/// Sentinel `source` value for a resolution that fell back to the
/// service's catalog base price.
pub const BASE_PRICE_SOURCE: &str = "BASE_PRICE";

/// A price override whose owning list is active and valid at the
/// evaluation instant, flattened to what resolution needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifyingItem {
    pub price: Decimal,
    pub priority: i32,
    pub price_list_id: Uuid,
    pub price_list_name: String,
    pub valid_from: DateTime<Utc>,
}

impl QualifyingItem {
    /// Flatten the overrides for `service_id` out of `lists`, keeping only
    /// those whose owning list qualifies at `as_of`. Store
    /// implementations that hold whole lists in memory share this with
    /// the engine; SQL-backed stores apply the same predicate in the query.
    pub fn from_lists<'a, I>(lists: I, service_id: Uuid, as_of: DateTime<Utc>) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a PriceList>,
    {
        lists
            .into_iter()
            .filter(|list| list.qualifies_at(as_of))
            .filter_map(|list| {
                list.item_for(service_id).map(|item| Self {
                    price: item.price,
                    priority: list.priority,
                    price_list_id: list.id,
                    price_list_name: list.name.clone(),
                    valid_from: list.valid_from,
                })
            })
            .collect()
    }
}

/// The effective price for one service at one instant, plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResolution {
    pub service_id: Uuid,
    pub final_price: Decimal,
    /// The winning list's name, or [`BASE_PRICE_SOURCE`].
    pub source: String,
    pub price_list_id: Option<Uuid>,
}

/// Total order over candidates: highest priority first, then the most
/// recently effective window, then lowest list id. The final key makes the
/// winner independent of store iteration order.
fn precedence(a: &QualifyingItem, b: &QualifyingItem) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.valid_from.cmp(&a.valid_from))
        .then_with(|| a.price_list_id.cmp(&b.price_list_id))
}

/// Pick the override that wins among `candidates`, if any.
pub fn select_override(candidates: &[QualifyingItem]) -> Option<&QualifyingItem> {
    candidates.iter().min_by(|a, b| precedence(a, b))
}

/// Resolve the effective price for `service` given the qualifying
/// overrides fetched for it. Pure: same inputs, same result.
pub fn resolve(service: &Service, candidates: &[QualifyingItem]) -> PriceResolution {
    match select_override(candidates) {
        Some(item) => PriceResolution {
            service_id: service.id,
            final_price: item.price,
            source: item.price_list_name.clone(),
            price_list_id: Some(item.price_list_id),
        },
        None => PriceResolution {
            service_id: service.id,
            final_price: service.base_price,
            source: BASE_PRICE_SOURCE.to_string(),
            price_list_id: None,
        },
    }
}
