use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use hemline_catalog::pricing;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculationRequest {
    pub service_id: Uuid,
    /// Evaluation instant; defaults to now.
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculationResponse {
    pub service_id: Uuid,
    pub final_price: Decimal,
    /// Winning price list name, or "BASE_PRICE".
    pub source: String,
    pub price_list_id: Option<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/pricing/calculate", post(calculate))
}

/// POST /pricing/calculate
/// Resolve the effective price for a service at an instant.
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<PricingCalculationRequest>,
) -> Result<Json<PricingCalculationResponse>, AppError> {
    let as_of = req.date.unwrap_or_else(Utc::now);

    let service = state
        .services
        .get_service(req.service_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Service {} not found", req.service_id)))?;

    let candidates = state
        .price_lists
        .find_qualifying_items(service.id, as_of)
        .await
        .map_err(AppError::internal)?;

    let resolution = pricing::resolve(&service, &candidates);

    Ok(Json(PricingCalculationResponse {
        service_id: resolution.service_id,
        final_price: resolution.final_price,
        source: resolution.source,
        price_list_id: resolution.price_list_id,
    }))
}
