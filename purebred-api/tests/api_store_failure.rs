//! Behaviour when the backing store is unreachable.

mod common;

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use axum::http::StatusCode;
use uuid::Uuid;

use common::{error_code, TestApp};
use purebred_api::config::AppConfig;
use purebred_api::models::{
    Announcement, Like, Match, Message, Owner, Pet, Species, SwipeAction, Verification,
};
use purebred_api::store::{PetFilter, Store};

/// Every call fails as if the database connection was lost.
struct DownStore;

#[async_trait]
impl Store for DownStore {
    fn backend(&self) -> &'static str {
        "down"
    }
    async fn ping(&self) -> anyhow::Result<()> {
        bail!("db down")
    }
    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        bail!("db down")
    }
    async fn create_owner(&self, _: Owner) -> anyhow::Result<Option<Owner>> {
        bail!("db down")
    }
    async fn get_owner(&self, _: Uuid) -> anyhow::Result<Option<Owner>> {
        bail!("db down")
    }
    async fn insert_pet(&self, _: Pet) -> anyhow::Result<()> {
        bail!("db down")
    }
    async fn get_pet(&self, _: Uuid) -> anyhow::Result<Option<Pet>> {
        bail!("db down")
    }
    async fn search_pets(&self, _: &PetFilter, _: usize) -> anyhow::Result<Vec<Pet>> {
        bail!("db down")
    }
    async fn insert_like(&self, _: Like) -> anyhow::Result<()> {
        bail!("db down")
    }
    async fn find_like(&self, _: Uuid, _: Uuid, _: SwipeAction) -> anyhow::Result<Option<Like>> {
        bail!("db down")
    }
    async fn find_match(&self, _: Uuid, _: Uuid) -> anyhow::Result<Option<Match>> {
        bail!("db down")
    }
    async fn create_match_if_absent(&self, _: Match) -> anyhow::Result<Option<Match>> {
        bail!("db down")
    }
    async fn get_match(&self, _: Uuid) -> anyhow::Result<Option<Match>> {
        bail!("db down")
    }
    async fn matches_for_owner(&self, _: Uuid, _: usize) -> anyhow::Result<Vec<Match>> {
        bail!("db down")
    }
    async fn insert_message(&self, _: Message) -> anyhow::Result<()> {
        bail!("db down")
    }
    async fn messages_for_match(&self, _: Uuid, _: usize) -> anyhow::Result<Vec<Message>> {
        bail!("db down")
    }
    async fn insert_announcement(&self, _: Announcement) -> anyhow::Result<()> {
        bail!("db down")
    }
    async fn list_announcements(
        &self,
        _: Option<Species>,
        _: usize,
    ) -> anyhow::Result<Vec<Announcement>> {
        bail!("db down")
    }
    async fn insert_verification(&self, _: Verification) -> anyhow::Result<()> {
        bail!("db down")
    }
}

fn down_app() -> TestApp {
    TestApp::with_store(Arc::new(DownStore), AppConfig::default())
}

#[tokio::test]
async fn swipe_fails_with_opaque_internal_error() {
    let app = down_app();
    let (p1, p2, o1) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

    let (status, body) = app
        .swipe(&p1.to_string(), &p2.to_string(), "like", &o1.to_string())
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "E0001");
    assert_eq!(body["error"]["message"], "internal server error");
    assert!(!body.to_string().contains("db down"), "cause leaked: {body}");
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let app = down_app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"][0]["name"], "store");
    assert_eq!(body["checks"][0]["status"], "unhealthy");
}

#[tokio::test]
async fn test_endpoint_reports_the_error_in_the_body() {
    let app = down_app();
    let (status, body) = app.get("/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "error: db down");
    assert_eq!(body["connection_status"], "not connected");
    assert_eq!(body["database_name"], "down");
    assert_eq!(body["collections"], serde_json::json!([]));
}
