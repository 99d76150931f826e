mod advisor;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod llm_client;
mod models;
mod render;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisor::{HeuristicAdvisor, LlmSuggestionAdvisor, SuggestionAdvisor};
use crate::config::{AdvisorBackend, Config};
use crate::db::{create_pool, ensure_schema};
use crate::jobs::{JobBoard, PgJobBoard};
use crate::llm_client::LlmClient;
use crate::render::S3ArtifactStore;
use crate::resume::store::PgResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalyst API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let jobs: Arc<dyn JobBoard> = Arc::new(PgJobBoard::new(db.clone()));

    // Initialize suggestion advisor (heuristic by default; swap via ADVISOR_BACKEND)
    let advisor: Arc<dyn SuggestionAdvisor> = match config.advisor_backend {
        AdvisorBackend::Heuristic => Arc::new(HeuristicAdvisor::new(jobs.clone())),
        AdvisorBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is not set")?;
            let llm = LlmClient::new(api_key).context("Failed to build HTTP client")?;
            info!("LLM advisor initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmSuggestionAdvisor::new(llm, jobs.clone()))
        }
    };
    info!("Suggestion advisor backend: {:?}", config.advisor_backend);

    // Build app state
    let state = AppState {
        resumes: Arc::new(PgResumeRepository::new(db)),
        advisor,
        jobs,
        artifacts: Arc::new(S3ArtifactStore::new(s3, config.s3_bucket.clone())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the SPA host once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "catalyst-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
