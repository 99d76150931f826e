//! Axum route handlers for resume suggestions.
//!
//! Advisor failures come back as non-fatal errors; the stored resume is only
//! ever read here.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::advisor::{MatchSuggestions, QualityScore, SkillSuggestions};
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidQuery};
use crate::resume::handlers::OwnerQuery;
use crate::resume::session::EditingSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/v1/resume/suggestions/match
pub async fn handle_match_suggestions(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
    ValidJson(request): ValidJson<MatchRequest>,
) -> Result<Json<MatchSuggestions>, AppError> {
    let session = EditingSession::open(state.resumes.as_ref(), params.user_id).await?;
    let suggestions = session
        .match_suggestions(state.advisor.as_ref(), request.job_id)
        .await?;
    info!(
        "Match score {}/100 for user {} against job {}",
        suggestions.match_score, params.user_id, request.job_id
    );
    Ok(Json(suggestions))
}

/// POST /api/v1/resume/suggestions/skills
pub async fn handle_skill_suggestions(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SkillsRequest>,
) -> Result<Json<SkillSuggestions>, AppError> {
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }
    let suggestions = state
        .advisor
        .skill_suggestions(&request.job_title, &request.job_description)
        .await?;
    Ok(Json(suggestions))
}

/// GET /api/v1/resume/quality
pub async fn handle_quality_score(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
) -> Result<Json<QualityScore>, AppError> {
    let session = EditingSession::open(state.resumes.as_ref(), params.user_id).await?;
    let score = session.quality_score(state.advisor.as_ref()).await?;
    Ok(Json(score))
}
