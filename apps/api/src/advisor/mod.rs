//! Suggestion advisor: the boundary to resume analysis.
//!
//! Two backends implement `SuggestionAdvisor`:
//! - `HeuristicAdvisor` (default): keyword and completeness checks, deterministic.
//! - `LlmSuggestionAdvisor`: prompts the model through `LlmClient`.
//!
//! `AppState` holds an `Arc<dyn SuggestionAdvisor>` chosen at startup from
//! `ADVISOR_BACKEND`. Every call takes the document by shared reference and
//! never mutates it.

pub mod handlers;
pub mod heuristic;
pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::RemoteServiceError;
use crate::resume::document::ResumeDocument;

pub use heuristic::HeuristicAdvisor;
pub use llm::LlmSuggestionAdvisor;

const MAX_SCORE: u32 = 100;
const MAX_SUBSCORE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSuggestions {
    pub match_score: u32,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub ats_optimization: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSuggestions {
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

/// Five sub-scores, each 0..=20, summing to the overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    pub content_completeness: u32,
    pub keyword_optimization: u32,
    pub formatting: u32,
    pub achievements: u32,
    pub ats_compatibility: u32,
}

impl QualityBreakdown {
    pub fn total(&self) -> u32 {
        self.content_completeness
            + self.keyword_optimization
            + self.formatting
            + self.achievements
            + self.ats_compatibility
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    pub overall_score: u32,
    pub breakdown: QualityBreakdown,
    #[serde(default)]
    pub feedback: Vec<String>,
}

/// Advisor trait. Implement this to swap analysis backends without touching
/// handlers or the editing session.
#[async_trait]
pub trait SuggestionAdvisor: Send + Sync {
    /// Fit of `document` against the posting `job_id`. An unknown job is a
    /// `RemoteServiceError::NotFound`.
    async fn match_suggestions(
        &self,
        document: &ResumeDocument,
        job_id: Uuid,
    ) -> Result<MatchSuggestions, RemoteServiceError>;

    async fn skill_suggestions(
        &self,
        job_title: &str,
        job_description: &str,
    ) -> Result<SkillSuggestions, RemoteServiceError>;

    async fn quality_score(&self, document: &ResumeDocument)
        -> Result<QualityScore, RemoteServiceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization: backends may return out-of-range numbers
// ────────────────────────────────────────────────────────────────────────────

impl MatchSuggestions {
    pub fn normalized(mut self) -> Self {
        self.match_score = self.match_score.min(MAX_SCORE);
        self
    }
}

impl QualityScore {
    /// Clamps every sub-score to 0..=20 and recomputes the overall score so
    /// the two always agree.
    pub fn normalized(mut self) -> Self {
        let b = &mut self.breakdown;
        for score in [
            &mut b.content_completeness,
            &mut b.keyword_optimization,
            &mut b.formatting,
            &mut b.achievements,
            &mut b.ats_compatibility,
        ] {
            *score = (*score).min(MAX_SUBSCORE);
        }
        self.overall_score = self.breakdown.total().min(MAX_SCORE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_score_clamped_to_100() {
        let m = MatchSuggestions {
            match_score: 140,
            matched_skills: vec![],
            missing_skills: vec![],
            improvements: vec![],
            ats_optimization: vec![],
        };
        assert_eq!(m.normalized().match_score, 100);
    }

    #[test]
    fn test_quality_breakdown_clamped_and_overall_recomputed() {
        let q = QualityScore {
            overall_score: 7,
            breakdown: QualityBreakdown {
                content_completeness: 25,
                keyword_optimization: 10,
                formatting: 20,
                achievements: 0,
                ats_compatibility: 15,
            },
            feedback: vec![],
        }
        .normalized();

        assert_eq!(q.breakdown.content_completeness, 20);
        assert_eq!(q.overall_score, 65);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let parsed: MatchSuggestions = serde_json::from_str(
            r#"{"matchScore": 72, "matchedSkills": ["rust"], "missingSkills": ["kafka"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.match_score, 72);
        assert!(parsed.improvements.is_empty());
        assert!(parsed.ats_optimization.is_empty());
    }
}
