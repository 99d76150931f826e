//! Editing session. Holds the canonical in-memory copy of one owner's resume.
//!
//! Edits go through `apply` / `apply_all`. Collaborator calls (advisor,
//! renderer) borrow the session immutably, so a failing or abandoned request
//! cannot leave the document half-changed.

use tracing::debug;
use uuid::Uuid;

use crate::advisor::{MatchSuggestions, QualityScore, SuggestionAdvisor};
use crate::errors::RemoteServiceError;
use crate::render::artifact_store::{export_to_store, ExportHandle};
use crate::render::{self, ArtifactStore, RenderedResume};
use crate::resume::document::ResumeDocument;
use crate::resume::editor::{EditError, EditOp};
use crate::resume::store::{self, ResumeRepository, SaveAck};

pub struct EditingSession {
    document: ResumeDocument,
}

impl EditingSession {
    /// Loads the owner's document, or starts from a default one.
    pub async fn open(repo: &dyn ResumeRepository, owner: Uuid) -> Result<Self, RemoteServiceError> {
        let document = store::load(repo, owner).await?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    /// Applies `ops` in order. If any op fails, none of them take effect.
    pub fn apply_all(&mut self, ops: Vec<EditOp>) -> Result<Vec<Option<usize>>, EditError> {
        let owner = self.document.owner;
        let mut draft = self.document.clone();
        let results = ops
            .into_iter()
            .enumerate()
            .map(|(i, op)| {
                op.apply(&mut draft)
                    .inspect_err(|e| debug!("Edit {i} rejected for owner {owner}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.document = draft;
        Ok(results)
    }

    pub async fn save(&self, repo: &dyn ResumeRepository) -> Result<SaveAck, RemoteServiceError> {
        store::save(repo, &self.document).await
    }

    /// Display tree for the current template, or for `template_id` when the
    /// user is only trying a template out.
    pub fn preview(&self, template_id: Option<&str>) -> RenderedResume {
        let template_id = template_id.unwrap_or(&self.document.template_id);
        render::render_for_display(&self.document, template_id)
    }

    pub async fn export(
        &self,
        artifacts: &dyn ArtifactStore,
    ) -> Result<ExportHandle, RemoteServiceError> {
        export_to_store(artifacts, &self.document).await
    }

    pub async fn match_suggestions(
        &self,
        advisor: &dyn SuggestionAdvisor,
        job_id: Uuid,
    ) -> Result<MatchSuggestions, RemoteServiceError> {
        advisor.match_suggestions(&self.document, job_id).await
    }

    pub async fn quality_score(
        &self,
        advisor: &dyn SuggestionAdvisor,
    ) -> Result<QualityScore, RemoteServiceError> {
        advisor.quality_score(&self.document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::SkillSuggestions;
    use crate::resume::document::ListSection;
    use crate::resume::store::InMemoryResumeRepository;
    use async_trait::async_trait;
    use serde_json::json;

    /// Advisor whose backing service is down.
    struct UnreachableAdvisor;

    #[async_trait]
    impl SuggestionAdvisor for UnreachableAdvisor {
        async fn match_suggestions(
            &self,
            _document: &ResumeDocument,
            _job_id: Uuid,
        ) -> Result<MatchSuggestions, RemoteServiceError> {
            Err(RemoteServiceError::Unreachable("connection refused".to_string()))
        }

        async fn skill_suggestions(
            &self,
            _job_title: &str,
            _job_description: &str,
        ) -> Result<SkillSuggestions, RemoteServiceError> {
            Err(RemoteServiceError::Unreachable("connection refused".to_string()))
        }

        async fn quality_score(
            &self,
            _document: &ResumeDocument,
        ) -> Result<QualityScore, RemoteServiceError> {
            Err(RemoteServiceError::Unreachable("connection refused".to_string()))
        }
    }

    fn append_skill(category: &str) -> EditOp {
        EditOp::Append {
            section: ListSection::Skills,
            record: json!({ "category": category, "items": ["Rust"] }),
        }
    }

    #[tokio::test]
    async fn test_failed_advisor_call_leaves_document_unchanged() {
        let repo = InMemoryResumeRepository::default();
        let mut session = EditingSession::open(&repo, Uuid::new_v4()).await.unwrap();
        session.apply_all(vec![append_skill("Languages")]).unwrap();
        let before = session.document().clone();

        let err = session
            .match_suggestions(&UnreachableAdvisor, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteServiceError::Unreachable(_)));
        assert!(session.quality_score(&UnreachableAdvisor).await.is_err());

        assert_eq!(session.document(), &before);
    }

    #[tokio::test]
    async fn test_batch_with_bad_op_applies_nothing() {
        let repo = InMemoryResumeRepository::default();
        let mut session = EditingSession::open(&repo, Uuid::new_v4()).await.unwrap();
        let before = session.document().clone();

        let err = session
            .apply_all(vec![
                append_skill("Languages"),
                append_skill("Tools"),
                EditOp::RemoveAt {
                    section: ListSection::Skills,
                    index: 5,
                },
            ])
            .unwrap_err();

        assert!(matches!(err, EditError::IndexOutOfRange { index: 5, len: 2, .. }));
        assert_eq!(session.document(), &before);
    }

    #[tokio::test]
    async fn test_batch_returns_append_indices() {
        let repo = InMemoryResumeRepository::default();
        let mut session = EditingSession::open(&repo, Uuid::new_v4()).await.unwrap();

        let results = session
            .apply_all(vec![
                append_skill("Languages"),
                append_skill("Tools"),
                EditOp::MoveItem {
                    section: ListSection::Skills,
                    from: 1,
                    to: 0,
                },
            ])
            .unwrap();

        assert_eq!(results, vec![Some(0), Some(1), None]);
        assert_eq!(session.document().sections.skills[0].category, "Tools");
    }

    #[tokio::test]
    async fn test_saved_session_reopens_identical() {
        let repo = InMemoryResumeRepository::default();
        let owner = Uuid::new_v4();

        let mut session = EditingSession::open(&repo, owner).await.unwrap();
        session
            .apply_all(vec![EditOp::SetTemplate {
                template_id: "template-2".to_string(),
            }])
            .unwrap();
        session.save(&repo).await.unwrap();

        let reopened = EditingSession::open(&repo, owner).await.unwrap();
        assert_eq!(reopened.document(), session.document());
        assert_eq!(reopened.preview(None).color_scheme.primary, "#000000");
        assert_eq!(reopened.preview(Some("template-3")).color_scheme.primary, "#7c3aed");
        assert_eq!(reopened.document().template_id, "template-2");
    }
}
