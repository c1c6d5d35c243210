//! HTTP surface.
//!
//! `build_router` wires every handler to the shared state. CORS and request
//! tracing are attached by `main.rs` so tests can drive the bare router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

use purebred_shared::middleware::metrics_middleware;

use crate::AppState;

pub mod announcements;
pub mod health;
pub mod messages;
pub mod owners;
pub mod pets;
pub mod swipes;
pub mod verification;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & diagnostics
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/schema", get(health::schema))
        .route("/test", get(health::test_database))
        .route("/metrics", get(health::metrics))
        // Owners
        .route("/owners", post(owners::create_owner))
        .route("/owners/:owner_id", get(owners::get_owner))
        // Pets
        .route("/pets", get(pets::list_pets).post(pets::create_pet))
        .route("/nearby", get(pets::nearby_pets))
        // Swipes & matches
        .route("/swipe", post(swipes::swipe))
        .route("/matches/:owner_id", get(swipes::list_matches))
        // Messaging
        .route("/messages", post(messages::send_message))
        .route("/messages/:match_id", get(messages::list_messages))
        // Announcements & verification
        .route(
            "/announcements",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route("/verification", post(verification::request_verification))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}
