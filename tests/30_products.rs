mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::collections::HashSet;

async fn create_category(app: &common::TestApp, token: &str, name: &str) -> String {
    let (status, body) = app
        .post("/api/categories", Some(token), json!({ "name": name }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create category failed: {body}");
    body["data"]["category"]["id"].as_str().expect("category id").to_string()
}

async fn create_product(
    app: &common::TestApp,
    token: &str,
    name: &str,
    category_id: &str,
) -> serde_json::Value {
    let (status, body) = app
        .post(
            "/api/products",
            Some(token),
            json!({
                "name": name,
                "category": category_id,
                "price": 199.99,
                "image": "https://img/item.jpg",
                "description": format!("{name} in a gift box"),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
    body["data"]["product"].clone()
}

#[tokio::test]
async fn create_populates_the_category_summary() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let rings_id = create_category(&app, &token, "Rings").await;

    let product = create_product(&app, &token, "Gold Band", &rings_id).await;
    assert_eq!(product["category"]["name"], "Rings");
    assert_eq!(product["category"]["id"], rings_id);
    assert_eq!(product["inStock"], true);
}

#[tokio::test]
async fn create_rejects_a_dangling_category() {
    let app = common::spawn_app();
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&token),
            json!({
                "name": "Orphan Ring",
                "category": "00000000-0000-0000-0000-000000000000",
                "price": 10.0,
                "image": "https://img/x.jpg",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category ID");
}

#[tokio::test]
async fn update_rechecks_the_category_reference() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let rings_id = create_category(&app, &token, "Rings").await;
    let product = create_product(&app, &token, "Gold Band", &rings_id).await;
    let product_id = product["id"].as_str().expect("product id");

    let (status, body) = app
        .put(
            &format!("/api/products/{product_id}"),
            Some(&token),
            json!({
                "name": "Gold Band",
                "category": "11111111-1111-1111-1111-111111111111",
                "price": 149.99,
                "image": "https://img/band.jpg",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category ID");

    // A valid reference goes through and keeps the stock flag.
    let (status, body) = app
        .put(
            &format!("/api/products/{product_id}"),
            Some(&token),
            json!({
                "name": "Rose Gold Band",
                "category": rings_id,
                "price": 149.99,
                "image": "https://img/band.jpg",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update failed: {body}");
    assert_eq!(body["data"]["product"]["name"], "Rose Gold Band");
    assert_eq!(body["data"]["product"]["inStock"], true);
}

#[tokio::test]
async fn payload_shape_is_validated() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let rings_id = create_category(&app, &token, "Rings").await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&token),
            json!({
                "name": "Bad Ring",
                "category": rings_id,
                "price": -5.0,
                "image": "https://img/x.jpg",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]
        .as_array()
        .is_some_and(|e| e.iter().any(|f| f["field"] == "price")));

    let (status, body) = app
        .post(
            "/api/products",
            Some(&token),
            json!({ "name": "No Image", "category": rings_id, "price": 5.0, "image": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]
        .as_array()
        .is_some_and(|e| e.iter().any(|f| f["field"] == "image")));
}

#[tokio::test]
async fn list_filters_by_category() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let rings_id = create_category(&app, &token, "Rings").await;
    let necklaces_id = create_category(&app, &token, "Necklaces").await;
    create_product(&app, &token, "Gold Band", &rings_id).await;
    create_product(&app, &token, "Pearl Strand", &necklaces_id).await;

    let (status, body) = app.get("/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = app.get(&format!("/api/products?category={rings_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Gold Band");
}

#[tokio::test]
async fn search_requires_a_query() {
    let app = common::spawn_app();

    let (status, body) = app.get("/api/products/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query is required");

    let (status, _) = app.get("/api/products/search?q=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_spans_category_names() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let necklaces_id = create_category(&app, &token, "Necklaces").await;
    let rings_id = create_category(&app, &token, "Rings").await;

    // Matches by its own name AND its category: must not be duplicated.
    create_product(&app, &token, "Pearl Necklace", &necklaces_id).await;
    // Only reachable through the category-name pass.
    create_product(&app, &token, "Golden Strand", &necklaces_id).await;
    create_product(&app, &token, "Gold Band", &rings_id).await;

    let (status, body) = app.get("/api/products/search?q=necklace", None).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["data"].as_array().expect("results");
    let names: Vec<&str> =
        results.iter().filter_map(|p| p["name"].as_str()).collect();
    assert!(names.contains(&"Pearl Necklace"));
    assert!(names.contains(&"Golden Strand"));
    assert!(!names.contains(&"Gold Band"));

    let ids: HashSet<&str> = results.iter().filter_map(|p| p["id"].as_str()).collect();
    assert_eq!(ids.len(), results.len(), "duplicate ids in search results");
}

#[tokio::test]
async fn search_caps_results_at_twenty() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let necklaces_id = create_category(&app, &token, "Necklaces").await;

    for i in 0..25 {
        create_product(&app, &token, &format!("Necklace {i}"), &necklaces_id).await;
    }

    let (status, body) = app.get("/api/products/search?q=necklace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 20);
}

#[tokio::test]
async fn delete_leaves_other_products_alone() {
    let app = common::spawn_app();
    let token = app.admin_token().await;
    let rings_id = create_category(&app, &token, "Rings").await;
    let doomed = create_product(&app, &token, "Doomed Ring", &rings_id).await;
    create_product(&app, &token, "Kept Ring", &rings_id).await;

    let doomed_id = doomed["id"].as_str().expect("product id");
    let (status, body) = app.delete(&format!("/api/products/{doomed_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = app.get(&format!("/api/products/{doomed_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/products", None).await;
    assert_eq!(body["count"], 1);
}
