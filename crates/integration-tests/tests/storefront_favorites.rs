//! Integration tests for the favorites API.

use axum::http::StatusCode;
use serde_json::json;

use drip_bloom_integration_tests::TestApp;

const SHOPPER: Option<i64> = Some(2001);

#[tokio::test]
async fn test_add_and_list_favorites() {
    let app = TestApp::new();

    let (status, favorite) = app
        .post("/api/favorites", json!({ "productId": "prod-3" }), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorite["productId"], "prod-3");

    let (status, list) = app.get("/api/favorites", SHOPPER).await;
    assert_eq!(status, StatusCode::OK);
    let entries = list.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    let entry = entries.first().expect("entry");
    assert_eq!(entry["id"], favorite["id"]);
    assert_eq!(entry["product"]["name"], "Trinity Set");
}

#[tokio::test]
async fn test_adding_twice_keeps_one_favorite() {
    let app = TestApp::new();

    let (_, first) = app
        .post("/api/favorites", json!({ "productId": "prod-5" }), SHOPPER)
        .await;
    let (status, second) = app
        .post("/api/favorites", json!({ "productId": "prod-5" }), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    let (_, count) = app.get("/api/favorites/count", SHOPPER).await;
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_add_rejects_bad_products() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/favorites", json!({ "productId": "prod-77" }), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = app
        .post("/api/favorites", json!({ "productId": "  " }), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "productId");
}

#[tokio::test]
async fn test_toggle_flips_state() {
    let app = TestApp::new();

    let (status, on) = app
        .post("/api/favorites/prod-2/toggle", json!({}), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(on, json!({ "productId": "prod-2", "favorite": true }));

    let (_, off) = app
        .post("/api/favorites/prod-2/toggle", json!({}), SHOPPER)
        .await;
    assert_eq!(off, json!({ "productId": "prod-2", "favorite": false }));

    let (_, list) = app.get("/api/favorites", SHOPPER).await;
    assert_eq!(list, json!([]));

    let (status, _) = app
        .post("/api/favorites/prod-404/toggle", json!({}), SHOPPER)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = TestApp::new();
    app.post("/api/favorites", json!({ "productId": "prod-6" }), SHOPPER)
        .await;

    for _ in 0..2 {
        let (status, body) = app.delete("/api/favorites/prod-6", SHOPPER).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Removed from favorites" }));
    }

    let (_, count) = app.get("/api/favorites/count", SHOPPER).await;
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let app = TestApp::new();
    app.post("/api/favorites", json!({ "productId": "prod-1" }), SHOPPER)
        .await;
    app.post("/api/favorites", json!({ "productId": "prod-4" }), None)
        .await;

    app.delete("/api/favorites/prod-1", Some(2002)).await;

    let (_, shopper) = app.get("/api/favorites/count", SHOPPER).await;
    let (_, other) = app.get("/api/favorites/count", Some(2002)).await;
    let (_, guest) = app.get("/api/favorites", None).await;
    assert_eq!(shopper, 1);
    assert_eq!(other, 0);
    assert_eq!(guest[0]["productId"], "prod-4");
}
