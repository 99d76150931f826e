//! Axum route handlers for preview and export.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ValidQuery;
use crate::render::artifact_store::ExportHandle;
use crate::render::RenderedResume;
use crate::resume::handlers::OwnerQuery;
use crate::resume::session::EditingSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub user_id: Uuid,
    /// Preview a template without selecting it.
    pub template_id: Option<String>,
}

/// GET /api/v1/resume/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PreviewQuery>,
) -> Result<Json<RenderedResume>, AppError> {
    let session = EditingSession::open(state.resumes.as_ref(), params.user_id).await?;
    Ok(Json(session.preview(params.template_id.as_deref())))
}

/// POST /api/v1/resume/export
///
/// Renders the stored resume to a printable file and returns its storage handle.
pub async fn handle_export(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
) -> Result<(StatusCode, Json<ExportHandle>), AppError> {
    let session = EditingSession::open(state.resumes.as_ref(), params.user_id).await?;
    let handle = session.export(state.artifacts.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(handle)))
}
