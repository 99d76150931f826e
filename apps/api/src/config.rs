use anyhow::{bail, Context, Result};

/// Which `SuggestionAdvisor` backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorBackend {
    Heuristic,
    Llm,
}

impl AdvisorBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(AdvisorBackend::Heuristic),
            "llm" => Ok(AdvisorBackend::Llm),
            other => bail!("ADVISOR_BACKEND must be 'heuristic' or 'llm', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub advisor_backend: AdvisorBackend,
    /// Only read when `advisor_backend` is `Llm`.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let advisor_backend = AdvisorBackend::parse(
            &std::env::var("ADVISOR_BACKEND").unwrap_or_else(|_| "heuristic".to_string()),
        )?;
        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        if advisor_backend == AdvisorBackend::Llm && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when ADVISOR_BACKEND=llm");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            advisor_backend,
            anthropic_api_key,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
