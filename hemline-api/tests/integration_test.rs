use std::str::FromStr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use hemline_api::{app, AppState};
use hemline_catalog::Service;
use hemline_core::repository::ServiceRepository;
use hemline_store::{seed, MemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        services: store.clone(),
        garments: store.clone(),
        price_lists: store.clone(),
    };
    (app(state), store)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn price(value: &Value) -> Decimal {
    Decimal::from_str(value["finalPrice"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn calculate_resolves_overrides_and_base_price() {
    let (router, store) = test_app();

    let service = Service::new("Hemming".into(), None, 15, dec!(12.00), None);
    store.create_service(&service).await.unwrap();

    // List A: priority 1, bounded to calendar year 2025, override 10.00.
    let (status, _) = send(
        &router,
        "POST",
        "/pricelists",
        Some(json!({
            "name": "A",
            "validFrom": "2025-01-01T00:00:00Z",
            "validTo": "2025-12-31T00:00:00Z",
            "active": true,
            "priority": 1,
            "items": [{ "serviceId": service.id, "price": "10.00" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // List B: priority 5, open-ended from June, override 9.00.
    let (status, created_b) = send(
        &router,
        "POST",
        "/pricelists",
        Some(json!({
            "name": "B",
            "validFrom": "2025-06-01T00:00:00Z",
            "validTo": null,
            "active": true,
            "priority": 5,
            "items": [{ "serviceId": service.id, "price": "9.00" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // July: both lists qualify, B's priority wins.
    let (status, body) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": service.id, "date": "2025-07-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(price(&body), dec!(9.00));
    assert_eq!(body["source"], "B");
    assert_eq!(body["priceListId"], created_b["id"]);

    // February: only A qualifies.
    let (status, body) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": service.id, "date": "2025-02-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(price(&body), dec!(10.00));
    assert_eq!(body["source"], "A");

    // 2024: nothing qualifies, base price applies.
    let (status, body) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": service.id, "date": "2024-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(price(&body), dec!(12.00));
    assert_eq!(body["source"], "BASE_PRICE");
    assert_eq!(body["priceListId"], Value::Null);
}

#[tokio::test]
async fn calculate_repeats_identically_for_identical_inputs() {
    let (router, store) = test_app();

    let service = Service::new("Patching".into(), None, 20, dec!(10.00), None);
    store.create_service(&service).await.unwrap();

    let request = json!({ "serviceId": service.id, "date": "2025-07-01T00:00:00Z" });
    let (_, first) = send(&router, "POST", "/pricing/calculate", Some(request.clone())).await;
    let (_, second) = send(&router, "POST", "/pricing/calculate", Some(request)).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn calculate_rejects_unknown_service_and_bad_input() {
    let (router, _) = test_app();

    let (status, body) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));

    // Unparsable date never reaches the engine.
    let (status, _) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": Uuid::new_v4(), "date": "not-a-date" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn price_list_crud_round_trip() {
    let (router, store) = test_app();

    let hemming = Service::new("Hemming".into(), None, 15, dec!(12.00), None);
    let tapering = Service::new("Tapering".into(), None, 30, dec!(25.00), None);
    store.create_service(&hemming).await.unwrap();
    store.create_service(&tapering).await.unwrap();

    // Unknown service ids in the request are skipped, not stored.
    let (status, created) = send(
        &router,
        "POST",
        "/pricelists",
        Some(json!({
            "name": "Winter Promo",
            "validFrom": "2025-11-01T00:00:00Z",
            "validTo": "2026-02-28T00:00:00Z",
            "active": true,
            "priority": 3,
            "items": [
                { "serviceId": hemming.id, "price": "9.50" },
                { "serviceId": tapering.id, "price": "19.00" },
                { "serviceId": Uuid::new_v4(), "price": "1.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["items"].as_array().unwrap().len(), 2);
    assert_eq!(created["items"][0]["serviceName"], "Hemming");

    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&router, "GET", &format!("/pricelists/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Winter Promo");

    // Full replacement: tapering disappears, hemming gets the new price.
    let (status, updated) = send(
        &router,
        "PUT",
        &format!("/pricelists/{id}"),
        Some(json!({
            "name": "Winter Promo v2",
            "validFrom": "2025-11-01T00:00:00Z",
            "validTo": null,
            "active": true,
            "priority": 4,
            "items": [{ "serviceId": hemming.id, "price": "8.75" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Winter Promo v2");
    assert_eq!(updated["priority"], 4);
    let items = updated["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price"], "8.75");

    let (status, listed) = send(&router, "GET", "/pricelists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", &format!("/pricelists/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &format!("/pricelists/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Soft-deleted lists stop qualifying immediately.
    let (status, body) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": hemming.id, "date": "2025-12-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "BASE_PRICE");
}

#[tokio::test]
async fn price_list_validation_failures_are_400s() {
    let (router, store) = test_app();

    let service = Service::new("Hemming".into(), None, 15, dec!(12.00), None);
    store.create_service(&service).await.unwrap();

    // Inverted window.
    let (status, body) = send(
        &router,
        "POST",
        "/pricelists",
        Some(json!({
            "name": "Backwards",
            "validFrom": "2025-06-01T00:00:00Z",
            "validTo": "2025-01-01T00:00:00Z",
            "priority": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("precedes"));

    // Same service twice in one list.
    let (status, _) = send(
        &router,
        "POST",
        "/pricelists",
        Some(json!({
            "name": "Dupes",
            "validFrom": "2025-01-01T00:00:00Z",
            "priority": 1,
            "items": [
                { "serviceId": service.id, "price": "9.00" },
                { "serviceId": service.id, "price": "8.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_endpoints_serve_the_seeded_defaults() {
    let (router, store) = test_app();
    seed::seed_catalog(store.as_ref(), store.as_ref()).await.unwrap();

    let (status, garments) = send(&router, "GET", "/catalog/garments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(garments.as_array().unwrap().len(), 6);

    let (status, services) = send(&router, "GET", "/catalog/services", None).await;
    assert_eq!(status, StatusCode::OK);
    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 6);
    let hemming = services.iter().find(|s| s["name"] == "Hemming").unwrap();
    assert_eq!(hemming["basePrice"], "12.00");

    // A service pointing at an unknown garment type is rejected.
    let (status, _) = send(
        &router,
        "POST",
        "/catalog/services",
        Some(json!({
            "name": "Lining Repair",
            "basePrice": "18.00",
            "garmentTypeId": Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Deleting a service hides it from the list and from pricing.
    let id = hemming["id"].as_str().unwrap().to_string();
    let (status, _) = send(&router, "DELETE", &format!("/catalog/services/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &router,
        "POST",
        "/pricing/calculate",
        Some(json!({ "serviceId": id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
