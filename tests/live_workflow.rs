use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn patch(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("response body is JSON")
}

/// End-to-end workflow against a running catalog service. Requires a live
/// server plus database; run with TEST_API_BASE_URL pointing at it.
#[tokio::test]
async fn test_catalog_complete_workflow() {
    let base_url = match std::env::var("TEST_API_BASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("TEST_API_BASE_URL not set, skipping live workflow test");
            return;
        }
    };

    let client = TestClient::new(base_url);

    // Wait for the server to be ready
    let mut retries = 0;
    loop {
        match client.get("/health").await {
            Ok(resp) if resp.status().is_success() => break,
            _ => {
                if retries >= 30 {
                    panic!("API server is not responding");
                }
                sleep(Duration::from_secs(2)).await;
                retries += 1;
            }
        }
    }

    // Unique suffix so re-runs do not collide with leftover rows
    let run = unique_suffix();

    // 1. Category tree: root + child
    let resp = client
        .post("/categories", json!({"name": format!("Bikes {run}")}))
        .await
        .expect("create root category");
    assert_eq!(resp.status(), 201);
    let root_id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    let resp = client
        .post(
            "/categories",
            json!({"name": format!("Road {run}"), "parent_id": root_id}),
        )
        .await
        .expect("create child category");
    assert_eq!(resp.status(), 201);
    let child_id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    // Parent with children cannot be deleted
    let resp = client
        .delete(&format!("/categories/{root_id}"))
        .await
        .expect("delete parent");
    assert_eq!(resp.status(), 409);

    // 2. Attribute + value, capitalized on write
    let resp = client
        .post("/attributes", json!({"name": format!("color {run}")}))
        .await
        .expect("create attribute");
    assert_eq!(resp.status(), 201);
    let attribute = json_body(resp).await;
    let attribute_id = attribute["data"]["id"].as_i64().unwrap();
    assert!(attribute["data"]["name"].as_str().unwrap().starts_with('C'));

    let resp = client
        .post(
            "/attribute-values",
            json!({"attribute_id": attribute_id, "value": "red"}),
        )
        .await
        .expect("create attribute value");
    assert_eq!(resp.status(), 201);
    let value_id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    // 3. Product linked to category and attribute
    let resp = client
        .post(
            "/products",
            json!({
                "name": format!("Roadster {run}"),
                "categories": [child_id],
                "attributes": [attribute_id],
                "base_price": 999.0
            }),
        )
        .await
        .expect("create product");
    assert_eq!(resp.status(), 201);
    let product = json_body(resp).await;
    let product_id = product["data"]["id"].as_i64().unwrap();
    assert_eq!(product["data"]["compare_price"].as_f64(), Some(999.0));

    // 4. Variant carrying the product's attribute value
    let resp = client
        .post(
            "/variants",
            json!({
                "product_id": product_id,
                "sku": format!("RD-{run}"),
                "base_price": 999.0,
                "stock": 3,
                "attribute_values": [value_id]
            }),
        )
        .await
        .expect("create variant");
    assert_eq!(resp.status(), 201);
    let variant_id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    // 5. Image scoped to the variant
    let resp = client
        .post(
            "/product-images",
            json!({
                "product_id": product_id,
                "variant_id": variant_id,
                "url": "https://img.example.com/roadster.jpg",
                "is_default": true
            }),
        )
        .await
        .expect("create image");
    assert_eq!(resp.status(), 201);
    let image_id = json_body(resp).await["data"]["id"].as_i64().unwrap();

    // 6. Patch and verify
    let resp = client
        .patch(
            &format!("/products/{product_id}"),
            json!({"base_price": 899.0}),
        )
        .await
        .expect("patch product");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(&format!("/products/{product_id}"))
        .await
        .expect("get product");
    let body = json_body(resp).await;
    assert_eq!(body["data"]["base_price"].as_f64(), Some(899.0));

    // 7. Tear down in dependency order
    for path in [
        format!("/product-images/{image_id}"),
        format!("/variants/{variant_id}"),
        format!("/products/{product_id}"),
        format!("/attribute-values/{value_id}"),
        format!("/attributes/{attribute_id}"),
        format!("/categories/{child_id}"),
        format!("/categories/{root_id}"),
    ] {
        let resp = client.delete(&path).await.expect("delete");
        assert_eq!(resp.status(), 204, "delete {path}");
    }
}

fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock after epoch")
        .as_millis()
}
