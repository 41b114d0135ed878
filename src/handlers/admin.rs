use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AvailabilityContext, DeletionCriteria, IntentLabel, IntentResult, TimeSlot};
use crate::nlu;
use crate::state::AppState;

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token == state.config.admin_token)
        .unwrap_or(false);

    if authorized {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub user_id: String,
    pub slots: Vec<TimeSlot>,
}

/// Operator view of the slots the bot currently sees for a platform account.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(platform_id): Path<String>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    require_admin(&state, &headers)?;

    let user = state
        .scheduling
        .resolve_user(&platform_id)
        .await
        .map_err(|e| AppError::Scheduling(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("no user for platform id {platform_id}")))?;

    let slots = state
        .scheduling
        .get_availability(&user.id)
        .await
        .map_err(|e| AppError::Scheduling(e.to_string()))?;

    Ok(Json(AvailabilityResponse {
        user_id: user.id,
        slots,
    }))
}

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    #[serde(default)]
    pub context: Vec<TimeSlot>,
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub intent: IntentResult,
    pub slots: Vec<TimeSlot>,
    pub deletion_criteria: Option<DeletionCriteria>,
}

/// Dry-run the understanding core against arbitrary text: the routing
/// decision with its evidence, plus whatever the extractor would produce.
/// Touches nothing.
pub async fn classify_preview(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    require_admin(&state, &headers)?;

    let context = AvailabilityContext::new(req.context);
    let intent = nlu::classify(&req.text, Some(&context));

    let slots = match intent.label {
        IntentLabel::AvailabilityUpdate => nlu::extract_slots(&req.text),
        _ => Vec::new(),
    };
    let deletion_criteria = match intent.label {
        IntentLabel::AvailabilityDeletion => nlu::extract_deletion_criteria(&req.text),
        _ => None,
    };

    Ok(Json(ClassifyResponse {
        intent,
        slots,
        deletion_criteria,
    }))
}
