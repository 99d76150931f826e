use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidPath, ValidQuery};
use crate::jobs::SubmitOutcome;
use crate::resume::handlers::OwnerQuery;
use crate::state::AppState;

/// POST /api/v1/jobs/:job_id/apply
pub async fn handle_apply_to_job(
    State(state): State<AppState>,
    ValidPath(job_id): ValidPath<Uuid>,
    ValidQuery(params): ValidQuery<OwnerQuery>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    match state.jobs.submit_application(job_id, params.user_id).await? {
        SubmitOutcome::Submitted => Ok((
            StatusCode::CREATED,
            Json(json!({ "job_id": job_id, "status": "submitted" })),
        )),
        SubmitOutcome::AlreadyApplied => Err(AppError::Conflict(format!(
            "Already applied to job {job_id}"
        ))),
    }
}
