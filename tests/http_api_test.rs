use httpmock::prelude::*;
use nutrisight::server::{create_router, AppState};
use nutrisight::{Gateway, GatewayConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

const APP_KEY: &str = "app-secret";

struct TestApp {
    addr: SocketAddr,
    client: reqwest::Client,
    provider: MockServer,
}

impl TestApp {
    /// One mock server stands in for every provider; their paths do not overlap.
    async fn spawn() -> Self {
        let provider = MockServer::start_async().await;
        let toml = format!(
            r#"
[server]
app_key = "{key}"

[usda]
base_url = "{url}"
api_key = "usda-key"

[nutritionix]
base_url = "{url}"
app_id = "nix-id"
api_key = "nix-key"

[open_food_facts]
base_url = "{url}"

[huggingface]
base_url = "{url}"
api_key = "hf-key"
"#,
            key = APP_KEY,
            url = provider.base_url(),
        );

        let config = GatewayConfig::from_toml_str(&toml).unwrap();
        let gateway = Arc::new(Gateway::from_config(&config).unwrap());
        let state = AppState::new(gateway, config.server.app_key.as_str());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            provider,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn post_json(&self, path: &str, key: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(key) = key {
            request = request.header("X-APP-KEY", key);
        }
        request.send().await.unwrap()
    }
}

#[tokio::test]
async fn test_index_welcomes() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "Welcome to the NutriSight API!");
}

#[tokio::test]
async fn test_barcode_requires_app_key() {
    let app = TestApp::spawn().await;

    let missing = app
        .post_json("/barcode", None, json!({ "barcodeData": "123" }))
        .await;
    assert_eq!(missing.status(), 401);

    let wrong = app
        .post_json("/barcode", Some("nope"), json!({ "barcodeData": "123" }))
        .await;
    assert_eq!(wrong.status(), 401);
    assert_eq!(wrong.text().await.unwrap(), "Unauthorized");

    for near_miss in ["app-secre", "app-secret-2", "APP-SECRET"] {
        let response = app
            .post_json("/barcode", Some(near_miss), json!({ "barcodeData": "123" }))
            .await;
        assert_eq!(response.status(), 401, "key {near_miss:?} should be rejected");
    }
}

#[tokio::test]
async fn test_barcode_rejects_missing_data() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/barcode", Some(APP_KEY), json!({})).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "No barcode data provided");

    let response = app
        .client
        .post(app.url("/barcode"))
        .header("X-APP-KEY", APP_KEY)
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_barcode_accepts_body_without_json_content_type() {
    let app = TestApp::spawn().await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET)
                .path("/foods/search")
                .query_param("query", "0123");
            then.status(200).json_body(json!({
                "foods": [{
                    "description": "OAT MILK",
                    "brandOwner": "Oatly",
                    "servingSize": 240.0,
                    "servingSizeUnit": "ml",
                    "foodNutrients": [
                        {"nutrientName": "Calcium, Ca", "value": 350.0, "unitName": "MG"}
                    ]
                }]
            }));
        })
        .await;

    let response = app
        .client
        .post(app.url("/barcode"))
        .header("X-APP-KEY", APP_KEY)
        .body(r#"{"barcodeData":"0123"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Barcode data received successfully");
    assert_eq!(body["data"]["name"], "OAT MILK");
    assert_eq!(body["data"]["servingSize"], "240ml");
    assert_eq!(body["data"]["nutrition"][0][0]["name"], "Calcium");
}

#[tokio::test]
async fn test_food_scan_accepts_plain_text_content_type() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/foodscan"))
        .header("X-APP-KEY", APP_KEY)
        .header("Content-Type", "text/plain")
        .body(r#"{"image":"%%% not base64 %%%"}"#)
        .send()
        .await
        .unwrap();

    // the body was read, so the failure is about the image, not the payload
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid image format");
}

#[tokio::test]
async fn test_barcode_wrong_method() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/barcode")).send().await.unwrap();
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_barcode_returns_nutritionix_envelope() {
    let app = TestApp::spawn().await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET).path("/foods/search");
            then.status(200).json_body(json!({ "foods": [] }));
        })
        .await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET).path("/search/item").query_param("upc", "0123");
            then.status(200).json_body(json!({
                "foods": [{
                    "food_name": "Granola Bar",
                    "brand_name": "Nature Valley",
                    "nf_ingredient_statement": "Whole Grain Oats, Sugar",
                    "full_nutrients": [{"attr_id": 203, "value": 3.2}]
                }]
            }));
        })
        .await;

    let response = app
        .post_json("/barcode", Some(APP_KEY), json!({ "barcodeData": "0123" }))
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "message": "Barcode data received successfully from Nutritionix",
            "data": {
                "name": "Granola Bar",
                "brand": "Nature Valley",
                "ingredients": "Whole Grain Oats, Sugar",
                "nutrition": [[{"name": "Protein", "amount": 3.2, "unit": "g"}]],
                "servingSize": "N/A"
            }
        })
    );
}

#[tokio::test]
async fn test_barcode_not_found() {
    let app = TestApp::spawn().await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET).path("/foods/search");
            then.status(200).json_body(json!({ "foods": [] }));
        })
        .await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET).path("/search/item");
            then.status(200).json_body(json!({ "foods": [] }));
        })
        .await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/product/0123.json");
            then.status(200).json_body(json!({ "product": { "product_name": "" } }));
        })
        .await;

    let response = app
        .post_json("/barcode", Some(APP_KEY), json!({ "barcodeData": "0123" }))
        .await;

    assert_eq!(response.status(), 404);
    assert_eq!(
        response.text().await.unwrap(),
        "No product found for the barcode"
    );
}

#[tokio::test]
async fn test_food_scan_rejects_bad_images() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/foodscan", Some(APP_KEY), json!({})).await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "No image provided");

    let response = app
        .post_json("/foodscan", Some(APP_KEY), json!({ "image": "%%% not base64 %%%" }))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid image format");
}

#[tokio::test]
async fn test_food_scan_returns_envelope() {
    let app = TestApp::spawn().await;
    let classify = app
        .provider
        .mock_async(|when, then| {
            when.method(POST).path("/models/nateraw/food").body("hello");
            then.status(200)
                .json_body(json!([{ "label": "omelette", "score": 0.97 }]));
        })
        .await;
    app.provider
        .mock_async(|when, then| {
            when.method(GET)
                .path("/foods/search")
                .query_param("query", "omelette");
            then.status(200).json_body(json!({
                "foods": [{
                    "dataType": "Survey (FNDDS)",
                    "description": "Egg omelet or scrambled egg",
                    "foodNutrients": [
                        {"nutrientName": "Protein", "value": 10.6, "unitName": "G"},
                        {"nutrientName": "Potassium, K", "value": 142.0, "unitName": "MG"}
                    ]
                }]
            }));
        })
        .await;

    let response = app
        .post_json(
            "/foodscan",
            Some(APP_KEY),
            json!({ "image": "data:image/jpeg;base64,aGVsbG8=" }),
        )
        .await;

    classify.assert_async().await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "message": "Food scan data received successfully",
            "data": {
                "foodName": "omelette",
                "nutrition": [[
                    {"name": "Protein", "amount": 10.6, "unit": "G"},
                    {"name": "Potassium", "amount": 142.0, "unit": "MG"}
                ]]
            }
        })
    );
}
