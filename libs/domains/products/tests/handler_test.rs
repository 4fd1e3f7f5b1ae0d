//! Handler tests for Products domain
//!
//! These drive the products router through `oneshot()` with the in-memory
//! repository, so no database is needed:
//! - Request deserialization (document field names, text or numeric price)
//! - Response shapes and HTTP status codes
//! - Missing-record and strict-price policies

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app_with(config: ProductsConfig, products: Vec<Product>) -> Router {
    let repo = InMemoryProductRepository::with_products(products);
    let service = ProductService::with_config(repo, config);
    Router::new().nest("/products", handlers::router(service))
}

fn app() -> Router {
    app_with(ProductsConfig::default(), Vec::new())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn seeded(name: &str, price: &str) -> Product {
    Product::new(CreateProduct {
        name: Some(name.into()),
        price: Some(price.into()),
        code: Some(1),
        description: Some(format!("Description {name}")),
    })
}

#[tokio::test]
async fn test_create_product_returns_201_with_generated_id() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/products",
            json!({
                "prod_name": "Product A",
                "prod_price": 10000,
                "prod_desc": "Description A",
                "prod_id": 1001
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert!(body["_id"].as_str().is_some_and(|id| id.parse::<uuid::Uuid>().is_ok()));
    assert_eq!(body["prod_name"], "Product A");
    assert_eq!(body["prod_price"], "10000");
    assert_eq!(body["prod_id"], 1001);
    assert!(body["updated_time"].is_string());
}

#[tokio::test]
async fn test_create_product_stamps_current_time() {
    let before = Utc::now();

    let response = app()
        .oneshot(json_request(
            "POST",
            "/products",
            json!({
                "prod_name": "Product A",
                "prod_price": "10000",
                "prod_desc": "Description A"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["prod_name"], "Product A");
    assert_eq!(body["prod_price"], "10000");
    assert_eq!(body["prod_desc"], "Description A");
    assert!(body["_id"].is_string());

    let updated_time: DateTime<Utc> = body["updated_time"].as_str().unwrap().parse().unwrap();
    let drift = (updated_time - before).num_seconds().abs();
    assert!(drift <= 5, "updated_time {updated_time} is {drift}s away from now");
}

#[tokio::test]
async fn test_create_product_casts_mistyped_fields() {
    for (body, field, expected) in [
        (json!({ "prod_name": 5 }), "prod_name", json!("5")),
        (json!({ "prod_desc": true }), "prod_desc", json!("true")),
        (json!({ "prod_id": "7" }), "prod_id", json!(7)),
    ] {
        let response = app()
            .oneshot(json_request("POST", "/products", body.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED, "{body}");
        let created: Value = json_body(response.into_body()).await;
        assert_eq!(created[field], expected, "{body}");
    }
}

#[tokio::test]
async fn test_create_product_rejects_uncastable_code() {
    let response = app()
        .oneshot(json_request("POST", "/products", json!({ "prod_id": "seven" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_create_product_accepts_empty_body() {
    let response = app()
        .oneshot(json_request("POST", "/products", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, None);
    assert_eq!(product.price, None);
}

#[tokio::test]
async fn test_create_product_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from("{\"prod_name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_list_products_returns_every_record() {
    let app = app_with(
        ProductsConfig::default(),
        vec![seeded("A", "1"), seeded("B", "2"), seeded("C", "3")],
    );

    let response = app.oneshot(empty_request("GET", "/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_list_products_empty_collection() {
    let response = app().oneshot(empty_request("GET", "/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_product_by_id() {
    let stored = seeded("Lamp", "250");
    let app = app_with(ProductsConfig::default(), vec![stored.clone()]);

    let response = app
        .oneshot(empty_request("GET", &format!("/products/{}", stored.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product, stored);
}

#[tokio::test]
async fn test_get_unknown_product_returns_null() {
    let response = app()
        .oneshot(empty_request(
            "GET",
            &format!("/products/{}", uuid::Uuid::now_v7()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_get_unknown_product_returns_404_under_status_policy() {
    let config = ProductsConfig {
        not_found: NotFoundPolicy::Status404,
        ..Default::default()
    };

    let response = app_with(config, Vec::new())
        .oneshot(empty_request(
            "GET",
            &format!("/products/{}", uuid::Uuid::now_v7()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_returns_400() {
    for (method, request) in [
        ("GET", empty_request("GET", "/products/not-an-id")),
        ("DELETE", empty_request("DELETE", "/products/not-an-id")),
        (
            "PUT",
            json_request("PUT", "/products/not-an-id", json!({ "prod_name": "X" })),
        ),
    ] {
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");

        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "INVALID_UUID", "{method}");
    }
}

#[tokio::test]
async fn test_update_merges_only_given_fields() {
    let stored = seeded("Product A", "10000");
    let app = app_with(ProductsConfig::default(), vec![stored.clone()]);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", stored.id),
            json!({ "prod_name": "X" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.id, stored.id);
    assert_eq!(product.name.as_deref(), Some("X"));
    assert_eq!(product.price, stored.price);
    assert_eq!(product.description, stored.description);
    assert_eq!(product.updated_time, stored.updated_time);
}

#[tokio::test]
async fn test_update_with_null_field_keeps_stored_value() {
    let stored = seeded("Product A", "10000");
    let app = app_with(ProductsConfig::default(), vec![stored.clone()]);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", stored.id),
            json!({ "prod_name": "X", "prod_desc": null }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name.as_deref(), Some("X"));
    assert_eq!(product.description, stored.description);
}

#[tokio::test]
async fn test_update_returns_previous_record_when_configured() {
    let stored = seeded("Product A", "10000");
    let config = ProductsConfig {
        update_returns: UpdateReturn::Before,
        ..Default::default()
    };
    let app = app_with(config, vec![stored.clone()]);
    let uri = format!("/products/{}", stored.id);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "prod_price": "1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let returned: Product = json_body(response.into_body()).await;
    assert_eq!(returned.price.as_deref(), Some("10000"));

    let response = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    let current: Product = json_body(response.into_body()).await;
    assert_eq!(current.price.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_update_unknown_product_returns_null() {
    let response = app()
        .oneshot(json_request(
            "PUT",
            &format!("/products/{}", uuid::Uuid::now_v7()),
            json!({ "prod_name": "X" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_delete_returns_removed_record() {
    let stored = seeded("Product A", "10000");
    let app = app_with(ProductsConfig::default(), vec![stored.clone()]);
    let uri = format!("/products/{}", stored.id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: DeleteProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.msg, "Product delete");
    assert_eq!(body.delete_product, Some(stored));

    let response = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_delete_unknown_product() {
    let response = app()
        .oneshot(empty_request(
            "DELETE",
            &format!("/products/{}", uuid::Uuid::now_v7()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "msg": "Product delete", "deleteProduct": null }));
}

#[tokio::test]
async fn test_strict_price_rejects_non_numeric_price() {
    let config = ProductsConfig {
        strict_price: true,
        ..Default::default()
    };

    let response = app_with(config, Vec::new())
        .oneshot(json_request(
            "POST",
            "/products",
            json!({ "prod_name": "Product A", "prod_price": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"].is_object());
}

#[tokio::test]
async fn test_relaxed_price_stores_text_verbatim() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/products",
            json!({ "prod_price": "abc" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.price.as_deref(), Some("abc"));
}
