use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use purebred_shared::errors::AppResult;
use purebred_shared::extract::ValidJson;
use purebred_shared::{parse_id, Created};

use crate::models::{Verification, VerificationKind, VerificationStatus};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct VerificationRequest {
    pub pet_id: String,
    #[serde(rename = "type")]
    pub kind: VerificationKind,
    #[serde(default)]
    pub status: VerificationStatus,
    pub document_url: Option<String>,
}

/// POST /verification - file a photo or pedigree verification request.
pub async fn request_verification(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<VerificationRequest>,
) -> AppResult<Json<Created>> {
    let verification = Verification {
        id: Uuid::now_v7(),
        pet_id: parse_id(&req.pet_id)?,
        kind: req.kind,
        status: req.status,
        document_url: req.document_url,
        created_at: Utc::now(),
    };
    let id = verification.id;

    state.store.insert_verification(verification).await?;
    tracing::info!(verification_id = %id, kind = %req.kind, "verification requested");

    Ok(Json(Created::new(id)))
}
