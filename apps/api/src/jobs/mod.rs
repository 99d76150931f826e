//! Job board: the posting lookup used by match suggestions, and job applications.

pub mod handlers;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::RemoteServiceError;
use crate::models::job::{JobApplicationRow, JobRow};

/// The parts of a job posting the resume tools read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub required_skills: Vec<String>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            required_skills: row.required_skills,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Submitted,
    AlreadyApplied,
}

#[async_trait]
pub trait JobBoard: Send + Sync {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, RemoteServiceError>;

    /// Records an application. A second application by the same user is
    /// reported as `AlreadyApplied`, not as an error.
    async fn submit_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<SubmitOutcome, RemoteServiceError>;
}

/// Fetches a posting, turning absence into `RemoteServiceError::NotFound`.
pub async fn require_job(board: &dyn JobBoard, job_id: Uuid) -> Result<JobPosting, RemoteServiceError> {
    board
        .get_job(job_id)
        .await?
        .ok_or_else(|| RemoteServiceError::NotFound(format!("Job {job_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres backend
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobBoard {
    pool: PgPool,
}

impl PgJobBoard {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobBoard for PgJobBoard {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, RemoteServiceError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn submit_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<SubmitOutcome, RemoteServiceError> {
        require_job(self, job_id).await?;

        let inserted = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications (id, job_id, user_id, status)
            VALUES ($1, $2, $3, 'applied')
            ON CONFLICT (job_id, user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(application) => {
                info!(
                    "Application {} recorded for job {job_id} by user {user_id}",
                    application.id
                );
                SubmitOutcome::Submitted
            }
            None => SubmitOutcome::AlreadyApplied,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

/// Process-local job board. Used in tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Default)]
pub struct InMemoryJobBoard {
    jobs: RwLock<HashMap<Uuid, JobPosting>>,
    applications: RwLock<HashSet<(Uuid, Uuid)>>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl InMemoryJobBoard {
    pub async fn insert(&self, job: JobPosting) {
        self.jobs.write().await.insert(job.id, job);
    }
}

#[async_trait]
impl JobBoard for InMemoryJobBoard {
    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, RemoteServiceError> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }

    async fn submit_application(
        &self,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<SubmitOutcome, RemoteServiceError> {
        require_job(self, job_id).await?;
        let fresh = self.applications.write().await.insert((job_id, user_id));
        Ok(if fresh {
            SubmitOutcome::Submitted
        } else {
            SubmitOutcome::AlreadyApplied
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_job(required_skills: &[&str]) -> JobPosting {
    JobPosting {
        id: Uuid::new_v4(),
        title: "Backend Engineer".to_string(),
        company: "Acme".to_string(),
        description: "Build and operate REST services.".to_string(),
        required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_application_is_reported_as_duplicate() {
        let board = InMemoryJobBoard::default();
        let job = sample_job(&["rust"]);
        let job_id = job.id;
        board.insert(job).await;
        let user = Uuid::new_v4();

        assert_eq!(
            board.submit_application(job_id, user).await.unwrap(),
            SubmitOutcome::Submitted
        );
        assert_eq!(
            board.submit_application(job_id, user).await.unwrap(),
            SubmitOutcome::AlreadyApplied
        );
        assert_eq!(
            board.submit_application(job_id, Uuid::new_v4()).await.unwrap(),
            SubmitOutcome::Submitted
        );
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let board = InMemoryJobBoard::default();
        let err = require_job(&board, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RemoteServiceError::NotFound(_)));

        let err = board
            .submit_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteServiceError::NotFound(_)));
    }
}
