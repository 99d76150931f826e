use std::sync::Arc;

use crate::advisor::SuggestionAdvisor;
use crate::jobs::JobBoard;
use crate::render::ArtifactStore;
use crate::resume::store::ResumeRepository;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every collaborator is a trait object so backends can be swapped at startup
/// (and replaced by in-memory versions in tests).
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeRepository>,
    /// Pluggable advisor. Default: HeuristicAdvisor. Swap via ADVISOR_BACKEND.
    pub advisor: Arc<dyn SuggestionAdvisor>,
    pub jobs: Arc<dyn JobBoard>,
    pub artifacts: Arc<dyn ArtifactStore>,
}
