//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidJson, ValidQuery};
use crate::resume::document::{ResumeDocument, ResumeView};
use crate::resume::editor::EditOp;
use crate::resume::session::EditingSession;
use crate::resume::store::{self, SaveAck};
use crate::resume::template::{self, TemplateInfo};
use crate::state::AppState;

/// Owner identity. Authentication sits in front of this service.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub ops: Vec<EditOp>,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    /// One entry per op: the new index for appends, null otherwise.
    pub results: Vec<Option<usize>>,
    pub resume: ResumeView,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(template::catalogue())
}

/// GET /api/v1/resume
///
/// Returns the stored resume, or a default one if the user has none yet.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
) -> Result<Json<ResumeView>, AppError> {
    let document = store::load(state.resumes.as_ref(), params.user_id).await?;
    Ok(Json(document.into()))
}

/// PUT /api/v1/resume
///
/// Upserts the full document. Saving the same body twice stores the same state;
/// `updatedAt` advances only when the content changes.
pub async fn handle_save_resume(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
    ValidJson(document): ValidJson<ResumeDocument>,
) -> Result<Json<SaveAck>, AppError> {
    if document.owner != params.user_id {
        return Err(AppError::Validation(
            "document owner does not match user_id".to_string(),
        ));
    }
    document.styling.validate().map_err(AppError::Validation)?;
    let ack = store::replace(state.resumes.as_ref(), document).await?;
    Ok(Json(ack))
}

/// POST /api/v1/resume/edits
///
/// Loads the resume, applies every op atomically, and saves the result.
/// A rejected op leaves the stored resume untouched.
pub async fn handle_apply_edits(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
    ValidJson(request): ValidJson<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    if request.ops.is_empty() {
        return Err(AppError::Validation("ops cannot be empty".to_string()));
    }

    let mut session = EditingSession::open(state.resumes.as_ref(), params.user_id).await?;
    let results = session.apply_all(request.ops)?;
    session.save(state.resumes.as_ref()).await?;

    Ok(Json(EditResponse {
        results,
        resume: session.document().clone().into(),
    }))
}
