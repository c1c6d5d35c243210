use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use purebred_shared::errors::AppResult;
use purebred_shared::extract::ValidJson;
use purebred_shared::{parse_id, Created};

use crate::models::Message;
use crate::services::message_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub match_id: String,
    pub sender_pet_id: String,
    pub sender_owner_id: String,
    pub text: String,
}

/// POST /messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<SendMessageRequest>,
) -> AppResult<Json<Created>> {
    let message = message_service::send_message(
        state.store.as_ref(),
        parse_id(&req.match_id)?,
        parse_id(&req.sender_pet_id)?,
        parse_id(&req.sender_owner_id)?,
        req.text,
    )
    .await?;

    Ok(Json(Created::new(message.id)))
}

/// GET /messages/:match_id - oldest first.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> AppResult<Json<Vec<Message>>> {
    let match_id = parse_id(&match_id)?;
    let messages = state
        .store
        .messages_for_match(match_id, state.config.conversation_limit)
        .await?;
    Ok(Json(messages))
}
