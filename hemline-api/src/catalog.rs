use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use hemline_catalog::{GarmentType, Service};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentTypeRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentTypeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

impl From<GarmentType> for GarmentTypeResponse {
    fn from(garment: GarmentType) -> Self {
        Self {
            id: garment.id,
            name: garment.name,
            description: garment.description,
            active: garment.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_duration_min")]
    pub default_duration_min: i32,
    pub base_price: Decimal,
    pub garment_type_id: Option<Uuid>,
}

fn default_duration_min() -> i32 {
    30
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub default_duration_min: i32,
    pub base_price: Decimal,
    pub active: bool,
    pub garment_type_id: Option<Uuid>,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            default_duration_min: service.default_duration_min,
            base_price: service.base_price,
            active: service.is_active,
            garment_type_id: service.garment_type_id,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog/garments", get(list_garments))
        .route("/catalog/garments", post(create_garment))
        .route("/catalog/garments/{id}", put(update_garment))
        .route("/catalog/garments/{id}", delete(delete_garment))
        .route("/catalog/services", get(list_services))
        .route("/catalog/services", post(create_service))
        .route("/catalog/services/{id}", put(update_service))
        .route("/catalog/services/{id}", delete(delete_service))
}

/// GET /catalog/garments
async fn list_garments(
    State(state): State<AppState>,
) -> Result<Json<Vec<GarmentTypeResponse>>, AppError> {
    let garments = state
        .garments
        .list_garment_types()
        .await
        .map_err(AppError::internal)?;

    Ok(Json(garments.into_iter().map(GarmentTypeResponse::from).collect()))
}

/// POST /catalog/garments
async fn create_garment(
    State(state): State<AppState>,
    Json(req): Json<GarmentTypeRequest>,
) -> Result<Json<GarmentTypeResponse>, AppError> {
    let garment = GarmentType::new(req.name, req.description);

    state
        .garments
        .create_garment_type(&garment)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(garment.into()))
}

/// PUT /catalog/garments/{id}
async fn update_garment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GarmentTypeRequest>,
) -> Result<Json<GarmentTypeResponse>, AppError> {
    let mut garment = state
        .garments
        .get_garment_type(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Garment type {} not found", id)))?;

    garment.name = req.name;
    garment.description = req.description;

    state
        .garments
        .update_garment_type(&garment)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(garment.into()))
}

/// DELETE /catalog/garments/{id}
async fn delete_garment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .garments
        .delete_garment_type(id)
        .await
        .map_err(AppError::internal)?;

    if !deleted {
        return Err(AppError::NotFoundError(format!("Garment type {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /catalog/services
async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services = state
        .services
        .list_services()
        .await
        .map_err(AppError::internal)?;

    Ok(Json(services.into_iter().map(ServiceResponse::from).collect()))
}

/// POST /catalog/services
async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<ServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    require_garment_type(&state, req.garment_type_id).await?;

    let service = Service::new(
        req.name,
        req.description,
        req.default_duration_min,
        req.base_price,
        req.garment_type_id,
    );

    state
        .services
        .create_service(&service)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(service.into()))
}

/// PUT /catalog/services/{id}
async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    let mut service = state
        .services
        .get_service(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Service {} not found", id)))?;

    require_garment_type(&state, req.garment_type_id).await?;

    service.name = req.name;
    service.description = req.description;
    service.default_duration_min = req.default_duration_min;
    service.base_price = req.base_price;
    service.garment_type_id = req.garment_type_id;

    state
        .services
        .update_service(&service)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(service.into()))
}

/// DELETE /catalog/services/{id}
async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .services
        .delete_service(id)
        .await
        .map_err(AppError::internal)?;

    if !deleted {
        return Err(AppError::NotFoundError(format!("Service {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// A service may only point at a garment type that exists.
async fn require_garment_type(state: &AppState, id: Option<Uuid>) -> Result<(), AppError> {
    if let Some(id) = id {
        state
            .garments
            .get_garment_type(id)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::ValidationError(format!("Garment type {} not found", id)))?;
    }
    Ok(())
}
