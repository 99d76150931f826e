//! Resume persistence: load with default-init, idempotent upsert on save.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::RemoteServiceError;
use crate::models::resume::ResumeDocumentRow;
use crate::resume::document::ResumeDocument;

/// Storage backend for resume documents, one per owner.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn find(&self, owner: Uuid) -> Result<Option<ResumeDocument>, RemoteServiceError>;

    /// Creates the owner's document if absent, overwrites it otherwise.
    async fn upsert(&self, document: &ResumeDocument) -> Result<(), RemoteServiceError>;
}

/// Acknowledgement returned by a successful save.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SaveAck {
    pub owner: Uuid,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Returns the stored document for `owner`, or a fresh default one.
/// The default is not persisted until the caller saves it.
pub async fn load(
    repo: &dyn ResumeRepository,
    owner: Uuid,
) -> Result<ResumeDocument, RemoteServiceError> {
    match repo.find(owner).await? {
        Some(doc) => Ok(doc),
        None => {
            debug!("No resume stored for {owner}; starting from defaults");
            Ok(ResumeDocument::new(owner))
        }
    }
}

pub async fn save(
    repo: &dyn ResumeRepository,
    document: &ResumeDocument,
) -> Result<SaveAck, RemoteServiceError> {
    repo.upsert(document).await?;
    info!("Saved resume for owner {}", document.owner);
    Ok(SaveAck {
        owner: document.owner,
        updated_at: document.updated_at,
    })
}

/// Saves a document the client sent whole. `updated_at` is owned by the
/// server here: it moves forward when the content differs from what is stored
/// and keeps the stored value otherwise, so export keys follow the content and
/// repeating the same save stores the same state.
pub async fn replace(
    repo: &dyn ResumeRepository,
    mut document: ResumeDocument,
) -> Result<SaveAck, RemoteServiceError> {
    match repo.find(document.owner).await? {
        Some(stored) if stored.same_content(&document) => document.updated_at = stored.updated_at,
        Some(_) => document.touch(),
        None => {}
    }
    save(repo, &document).await
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres backend
// ────────────────────────────────────────────────────────────────────────────

/// Stores each document as a single JSONB row keyed by owner.
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn find(&self, owner: Uuid) -> Result<Option<ResumeDocument>, RemoteServiceError> {
        let row = sqlx::query_as::<_, ResumeDocumentRow>(
            "SELECT * FROM resume_documents WHERE owner_id = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            serde_json::from_value(r.document).map_err(|e| {
                RemoteServiceError::InvalidResponse(format!(
                    "stored resume for {owner} is unreadable: {e}"
                ))
            })
        })
        .transpose()
    }

    async fn upsert(&self, document: &ResumeDocument) -> Result<(), RemoteServiceError> {
        let data = serde_json::to_value(document)
            .map_err(|e| RemoteServiceError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO resume_documents (owner_id, document, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (owner_id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(document.owner)
        .bind(data)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

/// Keeps documents in a process-local map. Used in tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Default)]
pub struct InMemoryResumeRepository {
    documents: RwLock<HashMap<Uuid, ResumeDocument>>,
}

#[async_trait]
impl ResumeRepository for InMemoryResumeRepository {
    async fn find(&self, owner: Uuid) -> Result<Option<ResumeDocument>, RemoteServiceError> {
        Ok(self.documents.read().await.get(&owner).cloned())
    }

    async fn upsert(&self, document: &ResumeDocument) -> Result<(), RemoteServiceError> {
        self.documents
            .write()
            .await
            .insert(document.owner, document.clone());
        Ok(())
    }
}
