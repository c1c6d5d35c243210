//! Shared helpers for the in-process router tests.
//!
//! The router is driven through `tower::ServiceExt::oneshot`; no socket is
//! bound. Every `TestApp` owns a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

use purebred_api::config::AppConfig;
use purebred_api::routes;
use purebred_api::store::{MemoryStore, Store};
use purebred_api::AppState;

pub struct TestApp {
    router: axum::Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    pub fn with_store(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let state = Arc::new(AppState::new(store, config));
        Self {
            router: routes::build_router(state),
        }
    }

    /// Drive the router with a single request and return (status, body).
    pub async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("oneshot failed");
        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body collect failed")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.call(req).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.call(req).await
    }

    /// POST expecting 200 and a `{"id": ..}` body; returns the id.
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, json) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::OK, "POST {uri} failed: {json}");
        json["id"].as_str().expect("id missing").to_string()
    }

    pub async fn owner(&self, name: &str) -> String {
        self.create(
            "/owners",
            json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) }),
        )
        .await
    }

    pub async fn pet(&self, owner_id: &str, species: &str, name: &str) -> String {
        self.create(
            "/pets",
            json!({
                "owner_id": owner_id,
                "species": species,
                "name": name,
                "breed": "Beagle",
                "age": 3,
                "gender": "male",
            }),
        )
        .await
    }

    pub async fn swipe(
        &self,
        liker: &str,
        target: &str,
        action: &str,
        owner: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/swipe",
            json!({
                "liker_pet_id": liker,
                "target_pet_id": target,
                "action": action,
                "created_by_owner_id": owner,
            }),
        )
        .await
    }
}

/// Error code from the shared `{success:false, error:{code,..}}` envelope.
pub fn error_code(body: &Value) -> &str {
    assert_eq!(body["success"], false, "not an error envelope: {body}");
    body["error"]["code"].as_str().unwrap_or_default()
}
