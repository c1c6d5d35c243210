use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use purebred_shared::errors::AppResult;
use purebred_shared::extract::{ValidJson, ValidQuery};
use purebred_shared::{parse_id, Created};

use crate::models::{Announcement, AnnouncementKind, Species};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    pub owner_id: String,
    pub pet_id: Option<String>,
    pub species: Species,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    pub city: Option<String>,
    /// ISO date of the event, if any.
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
}

/// POST /announcements
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateAnnouncementRequest>,
) -> AppResult<Json<Created>> {
    let announcement = Announcement {
        id: Uuid::now_v7(),
        owner_id: parse_id(&req.owner_id)?,
        pet_id: req.pet_id.as_deref().map(parse_id).transpose()?,
        species: req.species,
        title: req.title,
        description: req.description,
        city: req.city,
        date: req.date,
        kind: req.kind,
        created_at: Utc::now(),
    };
    let id = announcement.id;

    state.store.insert_announcement(announcement).await?;
    tracing::info!(announcement_id = %id, "announcement posted");

    Ok(Json(Created::new(id)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnnouncementParams {
    pub species: Option<Species>,
}

/// GET /announcements?species=dog
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<AnnouncementParams>,
) -> AppResult<Json<Vec<Announcement>>> {
    let announcements = state
        .store
        .list_announcements(params.species, state.config.list_limit)
        .await?;
    Ok(Json(announcements))
}
