//! Advisor backend that delegates analysis to the model via `LlmClient`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::advisor::prompts::{
    ADVISOR_ROLE, MATCH_PROMPT_TEMPLATE, QUALITY_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE,
};
use crate::advisor::{MatchSuggestions, QualityScore, SkillSuggestions, SuggestionAdvisor};
use crate::errors::RemoteServiceError;
use crate::jobs::{require_job, JobBoard};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::resume::document::ResumeDocument;

pub struct LlmSuggestionAdvisor {
    llm: LlmClient,
    jobs: Arc<dyn JobBoard>,
}

impl LlmSuggestionAdvisor {
    pub fn new(llm: LlmClient, jobs: Arc<dyn JobBoard>) -> Self {
        Self { llm, jobs }
    }

    async fn ask<T: serde::de::DeserializeOwned>(&self, prompt: &str) -> Result<T, RemoteServiceError> {
        let prompt = format!("{prompt}\n{GROUNDING_INSTRUCTION}");
        let system = format!("{ADVISOR_ROLE} {JSON_ONLY_SYSTEM}");
        Ok(self.llm.complete_json::<T>(&prompt, &system).await?)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RemoteServiceError> {
    serde_json::to_string_pretty(value).map_err(|e| RemoteServiceError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl SuggestionAdvisor for LlmSuggestionAdvisor {
    async fn match_suggestions(
        &self,
        document: &ResumeDocument,
        job_id: Uuid,
    ) -> Result<MatchSuggestions, RemoteServiceError> {
        let job = require_job(self.jobs.as_ref(), job_id).await?;
        let prompt = MATCH_PROMPT_TEMPLATE
            .replace("{resume_json}", &to_json(&document.sections)?)
            .replace("{job_json}", &to_json(&job)?);

        let suggestions: MatchSuggestions = self.ask(&prompt).await?;
        info!(
            "LLM match score {}/100 for owner {} against job {job_id}",
            suggestions.match_score, document.owner
        );
        Ok(suggestions.normalized())
    }

    async fn skill_suggestions(
        &self,
        job_title: &str,
        job_description: &str,
    ) -> Result<SkillSuggestions, RemoteServiceError> {
        let prompt = SKILLS_PROMPT_TEMPLATE
            .replace("{job_title}", job_title)
            .replace("{job_description}", job_description);
        self.ask(&prompt).await
    }

    async fn quality_score(
        &self,
        document: &ResumeDocument,
    ) -> Result<QualityScore, RemoteServiceError> {
        let prompt = QUALITY_PROMPT_TEMPLATE.replace("{resume_json}", &to_json(&document.sections)?);
        let score: QualityScore = self.ask(&prompt).await?;
        Ok(score.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::sync::Mutex;

    use crate::jobs::{sample_job, InMemoryJobBoard};
    use crate::resume::document::SkillGroup;

    /// Local stand-in for the Messages API that answers every request with
    /// the same status and body, and records what it was sent.
    struct StubMessagesApi {
        url: String,
        requests: Arc<Mutex<Vec<Value>>>,
    }

    impl StubMessagesApi {
        async fn start(status: StatusCode, body: Value) -> Self {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = requests.clone();
            let app = Router::new().route(
                "/v1/messages",
                post(move |Json(request): Json<Value>| {
                    let seen = seen.clone();
                    let body = body.clone();
                    async move {
                        seen.lock().await.push(request);
                        (status, Json(body))
                    }
                }),
            );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                url: format!("http://{addr}/v1/messages"),
                requests,
            }
        }

        /// Replies with `text` as the model's only content block.
        async fn replying(text: &str) -> Self {
            Self::start(
                StatusCode::OK,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "usage": { "input_tokens": 120, "output_tokens": 40 }
                }),
            )
            .await
        }

        async fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .await
                .iter()
                .map(|r| r["messages"][0]["content"].as_str().unwrap_or_default().to_string())
                .collect()
        }

        async fn request_count(&self) -> usize {
            self.requests.lock().await.len()
        }
    }

    fn advisor(api: &StubMessagesApi, board: Arc<InMemoryJobBoard>) -> LlmSuggestionAdvisor {
        let llm = LlmClient::with_api_url("test-key".to_string(), api.url.clone()).unwrap();
        LlmSuggestionAdvisor::new(llm, board)
    }

    fn resume_listing(skill: &str) -> ResumeDocument {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        doc.sections.skills.push(SkillGroup {
            category: "Languages".to_string(),
            items: vec![skill.to_string()],
        });
        doc
    }

    #[tokio::test]
    async fn test_match_prompt_carries_resume_and_job_and_score_is_clamped() {
        let api = StubMessagesApi::replying(
            "```json\n{\"matchScore\": 140, \"matchedSkills\": [\"rust\"], \"missingSkills\": [\"kafka\"]}\n```",
        )
        .await;
        let board = Arc::new(InMemoryJobBoard::default());
        let job = sample_job(&["rust", "kafka"]);
        let job_id = job.id;
        board.insert(job).await;

        let m = advisor(&api, board)
            .match_suggestions(&resume_listing("Zig"), job_id)
            .await
            .unwrap();
        assert_eq!(m.match_score, 100);
        assert_eq!(m.missing_skills, vec!["kafka"]);

        let prompts = api.prompts().await;
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.contains("\"Zig\""));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("\"kafka\""));
        assert!(!prompt.contains("{resume_json}"));
        assert!(!prompt.contains("{job_json}"));
        assert!(prompt.contains(GROUNDING_INSTRUCTION));

        let requests = api.requests.lock().await;
        let system = requests[0]["system"].as_str().unwrap();
        assert!(system.starts_with(ADVISOR_ROLE));
        assert!(system.contains("valid JSON only"));
    }

    #[tokio::test]
    async fn test_skill_prompt_carries_title_and_description() {
        let api = StubMessagesApi::replying(
            r#"{"technicalSkills": ["react", "typescript"], "softSkills": ["communication"]}"#,
        )
        .await;

        let s = advisor(&api, Arc::new(InMemoryJobBoard::default()))
            .skill_suggestions("Frontend Developer", "Build dashboards in React")
            .await
            .unwrap();
        assert_eq!(s.technical_skills, vec!["react", "typescript"]);
        assert_eq!(s.soft_skills, vec!["communication"]);

        let prompt = &api.prompts().await[0];
        assert!(prompt.contains("JOB TITLE: Frontend Developer"));
        assert!(prompt.contains("Build dashboards in React"));
        assert!(!prompt.contains("{job_title}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[tokio::test]
    async fn test_quality_subscores_are_clamped_and_total_recomputed() {
        let api = StubMessagesApi::replying(
            r#"{
                "overallScore": 97,
                "breakdown": {
                    "contentCompleteness": 25,
                    "keywordOptimization": 18,
                    "formatting": 20,
                    "achievements": 4,
                    "atsCompatibility": 30
                },
                "feedback": ["Quantify the internship bullets"]
            }"#,
        )
        .await;

        let q = advisor(&api, Arc::new(InMemoryJobBoard::default()))
            .quality_score(&resume_listing("Rust"))
            .await
            .unwrap();
        assert_eq!(q.breakdown.content_completeness, 20);
        assert_eq!(q.breakdown.ats_compatibility, 20);
        assert_eq!(q.overall_score, 20 + 18 + 20 + 4 + 20);
        assert_eq!(q.feedback.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_job_fails_before_calling_the_model() {
        let api = StubMessagesApi::replying(r#"{"matchScore": 50}"#).await;

        let err = advisor(&api, Arc::new(InMemoryJobBoard::default()))
            .match_suggestions(&resume_listing("Rust"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteServiceError::NotFound(_)));
        assert_eq!(api.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_prose_reply_is_an_invalid_response() {
        let api = StubMessagesApi::replying("I'm sorry, I can't assess this resume.").await;

        let err = advisor(&api, Arc::new(InMemoryJobBoard::default()))
            .quality_score(&resume_listing("Rust"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteServiceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_client_error_from_api_is_upstream_with_message() {
        let api = StubMessagesApi::start(
            StatusCode::BAD_REQUEST,
            json!({ "type": "error", "error": { "type": "invalid_request_error", "message": "prompt is too long" } }),
        )
        .await;

        let err = advisor(&api, Arc::new(InMemoryJobBoard::default()))
            .skill_suggestions("Data Analyst", "")
            .await
            .unwrap_err();
        match err {
            RemoteServiceError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "prompt is too long");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(api.request_count().await, 1);
    }
}
