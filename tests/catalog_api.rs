use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use catalog_service::api::create_router;
use catalog_service::store::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router().with_state(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_category(app: &Router, name: &str, parent_id: Option<i64>) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/categories",
        Some(json!({"name": name, "parent_id": parent_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create category: {body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app();
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_category_name_returns_409() {
    let app = app();
    create_category(&app, "Bikes", None).await;
    let (status, body) = send(&app, "POST", "/categories", Some(json!({"name": "Bikes"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn category_self_parent_returns_400() {
    let app = app();
    let id = create_category(&app, "Bikes", None).await;
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/categories/{id}"),
        Some(json!({"parent_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_parent_returns_404() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({"name": "Bikes", "parent_id": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_patch_returns_400() {
    let app = app();
    let id = create_category(&app, "Bikes", None).await;
    let (status, _) = send(&app, "PATCH", &format!("/categories/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_category_with_children_returns_409() {
    let app = app();
    let parent = create_category(&app, "Bikes", None).await;
    create_category(&app, "Road", Some(parent)).await;
    let (status, _) = send(&app, "DELETE", &format!("/categories/{parent}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn category_tree_nests_children_under_parents() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    let road = create_category(&app, "Road", Some(bikes)).await;
    let mountain = create_category(&app, "Mountain", Some(bikes)).await;
    let racing = create_category(&app, "Racing", Some(road)).await;

    let (status, body) = send(&app, "GET", "/categories/tree", None).await;
    assert_eq!(status, StatusCode::OK);

    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"].as_i64(), Some(bikes));

    let children = roots[0]["children"].as_array().unwrap();
    let child_ids: Vec<i64> = children.iter().map(|c| c["id"].as_i64().unwrap()).collect();
    assert_eq!(child_ids, vec![road, mountain]);

    let road_children = children[0]["children"].as_array().unwrap();
    assert_eq!(road_children.len(), 1);
    assert_eq!(road_children[0]["id"].as_i64(), Some(racing));
    // Leaf nodes serialize without a children key.
    assert!(road_children[0].get("children").is_none());
}

#[tokio::test]
async fn leaf_and_children_endpoints() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    let road = create_category(&app, "Road", Some(bikes)).await;
    let accessories = create_category(&app, "Accessories", None).await;

    let (status, body) = send(&app, "GET", "/categories/leaf", None).await;
    assert_eq!(status, StatusCode::OK);
    let leaf_ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(leaf_ids, vec![road, accessories]);

    let (status, body) = send(&app, "GET", &format!("/categories/{bikes}/children"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/categories/99/children", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_without_categories_fails_validation() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Roadster", "categories": [], "base_price": 100.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "categories"));
}

#[tokio::test]
async fn product_with_unknown_category_returns_404_and_creates_nothing() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Roadster", "categories": [42], "base_price": 100.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_create_read_update_delete_flow() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Roadster", "categories": [bikes], "base_price": 100.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product created");
    let id = body["data"]["id"].as_i64().unwrap();
    // compare_price falls back to base_price when omitted.
    assert_eq!(body["data"]["compare_price"].as_f64(), Some(100.0));
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/products/{id}"),
        Some(json!({"base_price": 120.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["base_price"].as_f64(), Some(120.0));

    let (status, _) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_list_filters_by_category() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    let parts = create_category(&app, "Parts", None).await;
    for (name, category) in [("Roadster", bikes), ("Chain", parts)] {
        let (status, _) = send(
            &app,
            "POST",
            "/products",
            Some(json!({"name": name, "categories": [category], "base_price": 10.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", &format!("/products?category_id={bikes}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Roadster");
}

#[tokio::test]
async fn attribute_names_are_capitalized() {
    let app = app();
    let (status, body) = send(&app, "POST", "/attributes", Some(json!({"name": "color"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Color");
    let attribute_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/attribute-values",
        Some(json!({"attribute_id": attribute_id, "value": "red"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["value"], "Red");

    let (status, _) = send(&app, "DELETE", &format!("/attributes/{attribute_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn variant_value_must_belong_to_product_attribute() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;

    let (_, color) = send(&app, "POST", "/attributes", Some(json!({"name": "color"}))).await;
    let color_id = color["data"]["id"].as_i64().unwrap();
    let (_, size) = send(&app, "POST", "/attributes", Some(json!({"name": "size"}))).await;
    let size_id = size["data"]["id"].as_i64().unwrap();

    let (_, red) = send(
        &app,
        "POST",
        "/attribute-values",
        Some(json!({"attribute_id": color_id, "value": "red"})),
    )
    .await;
    let red_id = red["data"]["id"].as_i64().unwrap();
    let (_, large) = send(
        &app,
        "POST",
        "/attribute-values",
        Some(json!({"attribute_id": size_id, "value": "large"})),
    )
    .await;
    let large_id = large["data"]["id"].as_i64().unwrap();

    let (status, product) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Roadster",
            "categories": [bikes],
            "attributes": [color_id],
            "base_price": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["data"]["id"].as_i64().unwrap();

    // "large" belongs to the size attribute, which the product does not carry.
    let (status, _) = send(
        &app,
        "POST",
        "/variants",
        Some(json!({
            "product_id": product_id,
            "sku": "RD-L",
            "base_price": 100.0,
            "attribute_values": [large_id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/variants",
        Some(json!({
            "product_id": product_id,
            "sku": "RD-R",
            "base_price": 100.0,
            "attribute_values": [red_id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["attribute_values"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn variant_list_filters_by_product() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    let mut product_ids = Vec::new();
    for name in ["Roadster", "Climber"] {
        let (_, body) = send(
            &app,
            "POST",
            "/products",
            Some(json!({"name": name, "categories": [bikes], "base_price": 100.0})),
        )
        .await;
        product_ids.push(body["data"]["id"].as_i64().unwrap());
    }
    for (i, product_id) in product_ids.iter().enumerate() {
        let (status, _) = send(
            &app,
            "POST",
            "/variants",
            Some(json!({"product_id": product_id, "sku": format!("SKU-{i}"), "base_price": 50.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/variants?product_id={}", product_ids[0]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let variants = body["data"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["sku"], "SKU-0");
}

#[tokio::test]
async fn image_batch_and_scoped_listing() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    let (_, product) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Roadster", "categories": [bikes], "base_price": 100.0})),
    )
    .await;
    let product_id = product["data"]["id"].as_i64().unwrap();
    let (_, variant) = send(
        &app,
        "POST",
        "/variants",
        Some(json!({"product_id": product_id, "sku": "RD-1", "base_price": 100.0})),
    )
    .await;
    let variant_id = variant["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/product-images/batch",
        Some(json!({"images": [
            {"product_id": product_id, "url": "https://img.example.com/1.jpg", "is_default": true},
            {"product_id": product_id, "variant_id": variant_id, "url": "https://img.example.com/2.jpg"}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "batch create: {body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/product-images/product/{product_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/product-images/variant/{variant_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_image_url_fails_validation() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/product-images",
        Some(json!({"product_id": 1, "url": "not-a-url"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].as_array().unwrap().iter().any(|e| e["field"] == "url"));
}

#[tokio::test]
async fn pagination_limits_product_list() {
    let app = app();
    let bikes = create_category(&app, "Bikes", None).await;
    for i in 0..12 {
        let (status, _) = send(
            &app,
            "POST",
            "/products",
            Some(json!({"name": format!("Product {i}"), "categories": [bikes], "base_price": 10.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Default page size is 10.
    let (_, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let (_, body) = send(&app, "GET", "/products?limit=5&offset=10", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
