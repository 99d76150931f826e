use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::RemoteServiceError;
use crate::render::html::{export_artifact, ExportArtifact};
use crate::resume::document::ResumeDocument;

/// Where exported artifacts are kept for download.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, artifact: &ExportArtifact) -> Result<(), RemoteServiceError>;
}

/// Download handle returned to the client after an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportHandle {
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
}

/// Renders `document` and stores the artifact. The key is derived from the
/// owner and `updated_at`, so exporting an unchanged document twice
/// overwrites the same object.
pub async fn export_to_store(
    store: &dyn ArtifactStore,
    document: &ResumeDocument,
) -> Result<ExportHandle, RemoteServiceError> {
    let artifact = export_artifact(document);
    let key = format!(
        "exports/{}/{}.html",
        document.owner,
        document.updated_at.format("%Y%m%dT%H%M%S%.9fZ")
    );
    store.put(&key, &artifact).await?;

    Ok(ExportHandle {
        key,
        file_name: artifact.file_name,
        content_type: artifact.content_type.to_string(),
        size_bytes: artifact.body.len(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO backend
// ────────────────────────────────────────────────────────────────────────────

pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, artifact: &ExportArtifact) -> Result<(), RemoteServiceError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(artifact.body.clone()))
            .content_type(artifact.content_type)
            .content_disposition(format!("attachment; filename=\"{}\"", artifact.file_name))
            .send()
            .await
            .map_err(|e| RemoteServiceError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded export to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

/// Process-local artifact store. Used in tests.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Default)]
pub struct InMemoryArtifactStore {
    objects: RwLock<HashMap<String, ExportArtifact>>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl InMemoryArtifactStore {
    pub async fn get(&self, key: &str) -> Option<ExportArtifact> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, key: &str, artifact: &ExportArtifact) -> Result<(), RemoteServiceError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), artifact.clone());
        Ok(())
    }
}
