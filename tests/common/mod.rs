#![allow(dead_code)]

use std::sync::{Arc, Once};

use car_doctor::{
    models::Document,
    services::store::{MemoryStore, Store},
    utils::config::AppConfig,
};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TEST_SECRET: &str = "test-access-token-secret";
pub const TEST_ORIGIN: &str = "https://car-doctor.test";

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("car_doctor=debug")
            .with_test_writer()
            .init();
    });
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "ACCESS_TOKEN_SECRET" => Some(TEST_SECRET.to_string()),
        "STORE" => Some("memory".to_string()),
        "CORS_ORIGIN" => Some(TEST_ORIGIN.to_string()),
        _ => None,
    })
    .expect("Test configuration should be valid")
}

/// A running server backed by an in-memory store the test can seed.
pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

/// Spawns the application on a random port with a fresh [`MemoryStore`].
///
/// Returned address format: `http://127.0.0.1:8492`
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let address = spawn_app_with_store(Arc::clone(&store) as Arc<dyn Store>).await;
    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

pub async fn spawn_app_with_store(store: Arc<dyn Store>) -> String {
    init_tracing_once();

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    let app = car_doctor::app(store, &test_config());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client.get(format!("{address}/")).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    address
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Calls `POST /jwt` and returns the `name=value` pair of the session cookie.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .client
            .post(self.url("/jwt"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("Failed to request token");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        session_cookie(&response).expect("No session cookie set")
    }

    pub async fn list_checkouts(&self, cookie: &str, email: &str) -> reqwest::Response {
        self.client
            .get(self.url("/checkouts"))
            .query(&[("email", email)])
            .header(COOKIE, cookie)
            .send()
            .await
            .expect("Failed to list checkouts")
    }

    pub async fn create_checkout(&self, payload: &Value) -> String {
        let response = self
            .client
            .post(self.url("/checkouts"))
            .json(payload)
            .send()
            .await
            .expect("Failed to create checkout");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["acknowledged"], json!(true));
        body["insertedId"]
            .as_str()
            .expect("insertedId should be a string")
            .to_string()
    }
}

/// Extracts `token=...` from the `Set-Cookie` header.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("token="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

pub fn oil_change_service() -> Document {
    document(json!({
        "service_id": "01",
        "title": "Full car Repair",
        "img": "https://i.ibb.co/R2D7GXG/888.jpg",
        "price": "200.00",
        "description": "Complete inspection and repair.",
        "facility": [
            {"name": "Instant Car Services", "details": "Same-day turnaround"},
            {"name": "24/7 Quality Service", "details": "Always open"}
        ],
        "rating": 4.8
    }))
}
