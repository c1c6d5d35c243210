use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use purebred_shared::errors::{AppError, AppResult, ErrorCode};
use purebred_shared::extract::ValidJson;
use purebred_shared::{parse_id, Created};

use crate::models::Owner;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOwnerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub location_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub location_lng: Option<f64>,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub verified: bool,
}

/// POST /owners
pub async fn create_owner(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateOwnerRequest>,
) -> AppResult<Json<Created>> {
    let owner = Owner {
        id: Uuid::now_v7(),
        name: req.name,
        email: normalize_email(&req.email),
        city: req.city,
        location_lat: req.location_lat,
        location_lng: req.location_lng,
        premium: req.premium,
        verified: req.verified,
        created_at: Utc::now(),
    };

    let created = state.store.create_owner(owner).await?.ok_or_else(|| {
        AppError::new(ErrorCode::EmailAlreadyExists, "owner with this email already exists")
    })?;

    tracing::info!(owner_id = %created.id, "owner registered");

    Ok(Json(Created::new(created.id)))
}

/// GET /owners/:owner_id
pub async fn get_owner(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> AppResult<Json<Owner>> {
    let owner_id = parse_id(&owner_id)?;

    let owner = state
        .store
        .get_owner(owner_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OwnerNotFound, "owner not found"))?;

    Ok(Json(owner))
}

/// Lowercase the domain and keep the local part as given.
fn normalize_email(raw: &str) -> String {
    let raw = raw.trim();
    match raw.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => raw.to_string(),
    }
}
