pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::jobs::handlers as jobs;
use crate::render::handlers as render;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(resume::handle_list_templates))
        // Resume document
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).put(resume::handle_save_resume),
        )
        .route("/api/v1/resume/edits", post(resume::handle_apply_edits))
        // Preview / export
        .route("/api/v1/resume/preview", get(render::handle_preview))
        .route("/api/v1/resume/export", post(render::handle_export))
        // Suggestions
        .route(
            "/api/v1/resume/suggestions/match",
            post(advisor::handle_match_suggestions),
        )
        .route(
            "/api/v1/resume/suggestions/skills",
            post(advisor::handle_skill_suggestions),
        )
        .route("/api/v1/resume/quality", get(advisor::handle_quality_score))
        // Jobs
        .route("/api/v1/jobs/:job_id/apply", post(jobs::handle_apply_to_job))
        .with_state(state)
}
