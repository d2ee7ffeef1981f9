//! End-to-end contract test over the HTTP router.
//!
//! Drives the JSON surface the terminal UI speaks: catalog CRUD with
//! optimistic concurrency, checkout, stock history and stats.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tally_server::{Config, ServerState, api};
use tower::ServiceExt;

async fn app() -> Router {
    let config = Config::with_overrides("./unused", 0);
    let state = ServerState::in_memory(&config).await.unwrap();
    api::router().with_state(state)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn category_crud_and_conflict() {
    let app = app().await;

    let (status, body) = request(&app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5); // seeded

    let (status, body) = request(
        &app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Coffee", "updated_at": 1000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["updated_at"], 1000);

    // Duplicate name is a 400-class constraint violation
    let (status, _) = request(
        &app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Coffee"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Stale write loses and gets the current snapshot back
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/categories/{id}"),
        Some(json!({"name": "Tea", "updated_at": 900})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["current"]["updated_at"], 1000);
    assert_eq!(body["current"]["name"], "Coffee");

    // Fresh write wins
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/categories/{id}"),
        Some(json!({"name": "Tea", "updated_at": 2000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["updated_at"], 2000);
}

#[tokio::test]
async fn product_checkout_history_stats_flow() {
    let app = app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/products",
        Some(json!({
            "name": "Shirt",
            "price": 9.99,
            "stock": 10,
            "category_id": null,
            "image_url": null,
            "variants": [
                {"name": "S", "stock": 4, "price_adjustment": 0.0},
                {"name": "L", "stock": 6, "price_adjustment": 1.5}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let product_id = body["id"].as_i64().unwrap();

    let (status, body) = request(&app, "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let product = body
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == product_id)
        .unwrap()
        .clone();
    assert_eq!(product["variants"].as_array().unwrap().len(), 2);
    let variant_id = product["variants"][1]["id"].as_i64().unwrap();

    // Scalar-stock line plus a variant line
    let (status, body) = request(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({
            "items": [
                {"id": product_id, "quantity": 2, "price": 9.99},
                {"id": product_id, "selected_variant_id": variant_id, "quantity": 1, "price": 11.49}
            ],
            "total": 31.47
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let sale_id = body["saleId"].as_i64().unwrap();

    // Stock decremented on the right targets
    let (_, body) = request(&app, "GET", &format!("/api/products/{product_id}"), None).await;
    assert_eq!(body["stock"], 8);
    assert_eq!(body["variants"][1]["stock"], 5);

    // Ledger newest first, tagged with the sale id
    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/products/{product_id}/history"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["reason"], format!("Sale #{sale_id}"));
    assert_eq!(rows[1]["reason"], format!("Sale #{sale_id}"));
    // Creation wrote one Initial Stock row for the scalar and one per variant
    assert_eq!(
        rows.iter()
            .filter(|r| r["reason"] == "Initial Stock")
            .count(),
        3
    );

    let (status, body) = request(&app, "GET", "/api/stats?threshold=9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revenue"], 31.47);
    assert_eq!(body["salesCount"], 1);
    assert_eq!(body["lowStockCount"], 1); // scalar stock 8 < 9
    assert_eq!(body["recentSales"][0]["item_count"], 2);
}

#[tokio::test]
async fn checkout_failure_rolls_back_and_returns_500() {
    let app = app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Mug", "price": 4.0, "stock": 6, "category_id": null, "image_url": null})),
    )
    .await;
    let product_id = body["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({
            "items": [
                {"id": product_id, "quantity": 1, "price": 4.0},
                {"id": 9999, "quantity": 1, "price": 1.0}
            ],
            "total": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing committed
    let (_, body) = request(&app, "GET", &format!("/api/products/{product_id}"), None).await;
    assert_eq!(body["stock"], 6);
    let (_, body) = request(&app, "GET", "/api/stats", None).await;
    assert_eq!(body["salesCount"], 0);

    // Empty carts are rejected up front as validation errors
    let (status, _) = request(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({"items": [], "total": 0.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_delete_guard_via_http() {
    let app = app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Outdoors"})),
    )
    .await;
    let category_id = body["id"].as_i64().unwrap();

    let (_, body) = request(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Tent", "price": 99.0, "stock": 2, "category_id": category_id, "image_url": null})),
    )
    .await;
    let product_id = body["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Cannot delete"));

    let (status, _) = request(&app, "DELETE", &format!("/api/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
