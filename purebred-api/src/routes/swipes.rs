use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use purebred_shared::errors::AppResult;
use purebred_shared::extract::ValidJson;
use purebred_shared::parse_id;

use crate::models::{Like, Match, SwipeAction};
use crate::services::swipe_service::{self, SwipeOutcome};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SwipeRequest {
    pub liker_pet_id: String,
    pub target_pet_id: String,
    pub action: SwipeAction,
    pub created_by_owner_id: String,
}

/// POST /swipe - record a like/pass and report whether it completed a match.
pub async fn swipe(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SwipeRequest>,
) -> AppResult<Json<SwipeOutcome>> {
    let like = Like::new(
        parse_id(&req.liker_pet_id)?,
        parse_id(&req.target_pet_id)?,
        req.action,
        parse_id(&req.created_by_owner_id)?,
    );

    let outcome = swipe_service::swipe(state.store.as_ref(), like).await?;
    Ok(Json(outcome))
}

/// GET /matches/:owner_id - matches where the owner is on either side.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> AppResult<Json<Vec<Match>>> {
    let owner_id = parse_id(&owner_id)?;
    let matches = state
        .store
        .matches_for_owner(owner_id, state.config.conversation_limit)
        .await?;
    Ok(Json(matches))
}
