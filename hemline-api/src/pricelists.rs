use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use hemline_catalog::pricelist::{validate_window, PriceList, PriceListError, PriceListItem};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListRequest {
    pub name: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub items: Vec<ItemRequest>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub service_id: Uuid,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListResponse {
    pub id: Uuid,
    pub name: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub active: bool,
    pub priority: i32,
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub service_id: Uuid,
    pub service_name: Option<String>,
    pub price: Decimal,
    pub base_price: Option<Decimal>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pricelists", post(create_price_list))
        .route("/pricelists", get(list_price_lists))
        .route("/pricelists/{id}", get(get_price_list))
        .route("/pricelists/{id}", put(update_price_list))
        .route("/pricelists/{id}", delete(delete_price_list))
}

/// POST /pricelists
async fn create_price_list(
    State(state): State<AppState>,
    Json(req): Json<PriceListRequest>,
) -> Result<Json<PriceListResponse>, AppError> {
    let mut list = PriceList::new(req.name, req.valid_from, req.valid_to, req.active, req.priority)
        .map_err(validation)?;

    let items = resolve_items(&state, req.items).await?;
    list.replace_items(items).map_err(validation)?;

    state
        .price_lists
        .create_price_list(&list)
        .await
        .map_err(AppError::internal)?;

    to_response(&state, list).await.map(Json)
}

/// GET /pricelists
async fn list_price_lists(
    State(state): State<AppState>,
) -> Result<Json<Vec<PriceListResponse>>, AppError> {
    let lists = state
        .price_lists
        .list_price_lists()
        .await
        .map_err(AppError::internal)?;

    let mut responses = Vec::with_capacity(lists.len());
    for list in lists {
        responses.push(to_response(&state, list).await?);
    }

    Ok(Json(responses))
}

/// GET /pricelists/{id}
async fn get_price_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PriceListResponse>, AppError> {
    let list = state
        .price_lists
        .get_price_list(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("PriceList {} not found", id)))?;

    to_response(&state, list).await.map(Json)
}

/// PUT /pricelists/{id}
/// Full replacement: header fields are overwritten and any item missing
/// from the request is removed.
async fn update_price_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PriceListRequest>,
) -> Result<Json<PriceListResponse>, AppError> {
    let mut list = state
        .price_lists
        .get_price_list(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("PriceList {} not found", id)))?;

    validate_window(req.valid_from, req.valid_to).map_err(validation)?;

    list.name = req.name;
    list.valid_from = req.valid_from;
    list.valid_to = req.valid_to;
    list.is_active = req.active;
    list.priority = req.priority;

    let items = resolve_items(&state, req.items).await?;
    list.replace_items(items).map_err(validation)?;

    state
        .price_lists
        .replace_price_list(&list)
        .await
        .map_err(AppError::internal)?;

    to_response(&state, list).await.map(Json)
}

/// DELETE /pricelists/{id}
async fn delete_price_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .price_lists
        .delete_price_list(id)
        .await
        .map_err(AppError::internal)?;

    if !deleted {
        return Err(AppError::NotFoundError(format!("PriceList {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helpers
// ============================================================================

fn validation(err: PriceListError) -> AppError {
    AppError::ValidationError(err.to_string())
}

/// Turn item requests into owned items. Entries whose service id does not
/// resolve are skipped, not an error; the response shows what was stored.
async fn resolve_items(
    state: &AppState,
    items: Vec<ItemRequest>,
) -> Result<Vec<PriceListItem>, AppError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let service = state
            .services
            .get_service(item.service_id)
            .await
            .map_err(AppError::internal)?;

        if service.is_some() {
            out.push(PriceListItem::new(item.service_id, item.price));
        }
    }
    Ok(out)
}

async fn to_response(state: &AppState, list: PriceList) -> Result<PriceListResponse, AppError> {
    let mut items = Vec::with_capacity(list.items.len());
    for item in &list.items {
        let service = state
            .services
            .get_service(item.service_id)
            .await
            .map_err(AppError::internal)?;

        items.push(ItemResponse {
            service_id: item.service_id,
            service_name: service.as_ref().map(|s| s.name.clone()),
            price: item.price,
            base_price: service.map(|s| s.base_price),
        });
    }

    Ok(PriceListResponse {
        id: list.id,
        name: list.name,
        valid_from: list.valid_from,
        valid_to: list.valid_to,
        active: list.is_active,
        priority: list.priority,
        items,
    })
}
