//! Deterministic advisor backend. No model call; only the job board is consulted.
//!
//! Match: each required skill of the posting is looked up in the resume's
//! skill groups and project technologies (listed), then in the free text of
//! summary, experience and projects (mentioned).
//!   match_score = round(matched / required × 100)
//! Quality: five 0..=20 sub-scores (completeness, keywords, formatting,
//! quantified achievements, ATS basics) summed to 0..=100.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::advisor::{
    MatchSuggestions, QualityBreakdown, QualityScore, SkillSuggestions, SuggestionAdvisor,
};
use crate::errors::RemoteServiceError;
use crate::jobs::{require_job, JobBoard, JobPosting};
use crate::resume::document::ResumeDocument;
use crate::resume::template::Template;

const TECHNICAL_SKILLS: &[&str] = &[
    "rust", "go", "golang", "python", "java", "javascript", "typescript", "c++", "c#",
    "kotlin", "swift", "sql", "postgresql", "mysql", "mongodb", "redis", "react",
    "angular", "vue", "node.js", "express", "django", "flask", "spring boot", "graphql",
    "rest", "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "linux", "git",
    "ci/cd", "kafka", "machine learning", "deep learning", "data analysis", "tensorflow",
    "pytorch", "html", "css", "tailwind", "microservices", "system design",
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "collaboration",
    "problem solving",
    "critical thinking",
    "time management",
    "adaptability",
    "ownership",
    "mentoring",
    "attention to detail",
    "stakeholder management",
];

/// Characters that mark a bullet as carrying a measurable result.
const METRIC_MARKERS: &[char] = &['%', '$', '€', '£', '₹'];

const SUMMARY_MIN_CHARS: usize = 50;
const SUMMARY_MAX_CHARS: usize = 600;
const MAX_IMPROVEMENTS: usize = 5;

pub struct HeuristicAdvisor {
    jobs: Arc<dyn JobBoard>,
}

impl HeuristicAdvisor {
    pub fn new(jobs: Arc<dyn JobBoard>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl SuggestionAdvisor for HeuristicAdvisor {
    async fn match_suggestions(
        &self,
        document: &ResumeDocument,
        job_id: Uuid,
    ) -> Result<MatchSuggestions, RemoteServiceError> {
        let job = require_job(self.jobs.as_ref(), job_id).await?;
        Ok(compute_match(document, &job))
    }

    async fn skill_suggestions(
        &self,
        job_title: &str,
        job_description: &str,
    ) -> Result<SkillSuggestions, RemoteServiceError> {
        Ok(suggest_skills(job_title, job_description))
    }

    async fn quality_score(
        &self,
        document: &ResumeDocument,
    ) -> Result<QualityScore, RemoteServiceError> {
        Ok(compute_quality(document))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text helpers
// ────────────────────────────────────────────────────────────────────────────

/// Lowercased word tokens. `+`, `#`, `.` and `/` stay inside words so that
/// "c++", "node.js" and "ci/cd" survive.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/')))
        .map(|t| t.trim_end_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when the words of `phrase` appear consecutively in `tokens`.
fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words = tokenize(phrase);
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    tokens.windows(words.len()).any(|w| w == words.as_slice())
}

fn is_quantified(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) || text.contains(METRIC_MARKERS)
}

/// Skill terms the resume lists explicitly, lowercased.
fn listed_skills(doc: &ResumeDocument) -> BTreeSet<String> {
    let sections = &doc.sections;
    sections
        .skills
        .iter()
        .flat_map(|g| g.items.iter())
        .chain(sections.projects.iter().flat_map(|p| p.technologies.iter()))
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Free-text tokens from summary, experience and projects.
fn narrative_tokens(doc: &ResumeDocument) -> Vec<String> {
    let sections = &doc.sections;
    let mut text = sections.summary.clone();
    for e in &sections.experience {
        text.push(' ');
        text.push_str(&e.title);
        text.push(' ');
        text.push_str(&e.description);
        for a in &e.achievements {
            text.push(' ');
            text.push_str(a);
        }
    }
    for p in &sections.projects {
        text.push(' ');
        text.push_str(&p.description);
    }
    tokenize(&text)
}

// ────────────────────────────────────────────────────────────────────────────
// Match suggestions
// ────────────────────────────────────────────────────────────────────────────

fn compute_match(doc: &ResumeDocument, job: &JobPosting) -> MatchSuggestions {
    let mut required: Vec<String> = job
        .required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if required.is_empty() {
        // Postings without a skills list: fall back to terms named in the text.
        required = suggest_skills(&job.title, &job.description).technical_skills;
    }
    let mut seen = BTreeSet::new();
    required.retain(|s| seen.insert(s.clone()));

    let listed = listed_skills(doc);
    let narrative = narrative_tokens(doc);

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut ats_optimization = Vec::new();

    for skill in &required {
        if listed.contains(skill) {
            matched_skills.push(skill.clone());
        } else if contains_phrase(&narrative, skill) {
            matched_skills.push(skill.clone());
            ats_optimization.push(format!(
                "List '{skill}' in your Skills section; it only appears in descriptions"
            ));
        } else {
            missing_skills.push(skill.clone());
        }
    }

    let match_score = if required.is_empty() {
        0
    } else {
        ((matched_skills.len() as f64 / required.len() as f64) * 100.0).round() as u32
    };

    let mut improvements: Vec<String> = missing_skills
        .iter()
        .take(MAX_IMPROVEMENTS)
        .map(|s| format!("Add a project or experience entry that demonstrates {s}"))
        .collect();
    if doc.sections.summary.trim().is_empty() {
        improvements.push(format!(
            "Write a summary tailored to the {} role at {}",
            job.title, job.company
        ));
    }
    if !contains_phrase(&narrative, &job.title) {
        ats_optimization.push(format!(
            "Use the exact job title '{}' in your summary or experience",
            job.title
        ));
    }

    MatchSuggestions {
        match_score,
        matched_skills,
        missing_skills,
        improvements,
        ats_optimization,
    }
    .normalized()
}

// ────────────────────────────────────────────────────────────────────────────
// Skill suggestions
// ────────────────────────────────────────────────────────────────────────────

fn suggest_skills(job_title: &str, job_description: &str) -> SkillSuggestions {
    let tokens = tokenize(&format!("{job_title} {job_description}"));
    let pick = |vocabulary: &[&str]| -> Vec<String> {
        vocabulary
            .iter()
            .filter(|term| contains_phrase(&tokens, term))
            .map(|term| term.to_string())
            .collect()
    };
    SkillSuggestions {
        technical_skills: pick(TECHNICAL_SKILLS),
        soft_skills: pick(SOFT_SKILLS),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quality score
// ────────────────────────────────────────────────────────────────────────────

fn compute_quality(doc: &ResumeDocument) -> QualityScore {
    let s = &doc.sections;
    let info = &s.personal_info;
    let mut feedback = Vec::new();

    // Content completeness
    let mut content_completeness = 0;
    for (present, points) in [
        (!info.full_name.trim().is_empty(), 2),
        (!info.email.trim().is_empty(), 2),
        (!info.phone.trim().is_empty(), 2),
        (!s.summary.trim().is_empty(), 2),
        (!s.education.is_empty(), 3),
        (!s.experience.is_empty(), 4),
        (!s.skills.is_empty(), 3),
        (!s.projects.is_empty(), 2),
    ] {
        if present {
            content_completeness += points;
        }
    }
    if s.experience.is_empty() {
        feedback.push("Add at least one experience or internship entry".to_string());
    }
    if s.projects.is_empty() {
        feedback.push("Add projects that show what you have built".to_string());
    }

    // Keyword optimization
    let skill_count = listed_skills(doc).len() as u32;
    let keyword_optimization = (skill_count * 2).min(20);
    if skill_count < 5 {
        feedback.push(format!(
            "List more relevant skills (found {skill_count}, aim for at least 10)"
        ));
    }

    // Formatting
    let mut formatting: u32 = 20;
    let summary_len = s.summary.trim().chars().count();
    if summary_len > SUMMARY_MAX_CHARS {
        formatting = formatting.saturating_sub(5);
        feedback.push("Shorten your summary to a few focused sentences".to_string());
    } else if summary_len > 0 && summary_len < SUMMARY_MIN_CHARS {
        formatting = formatting.saturating_sub(3);
        feedback.push("Expand your summary beyond a single phrase".to_string());
    }
    if s.experience.iter().any(|e| e.duration.trim().is_empty()) {
        formatting = formatting.saturating_sub(4);
        feedback.push("Give every experience entry a duration".to_string());
    }
    if s.education.iter().any(|e| e.year.trim().is_empty()) {
        formatting = formatting.saturating_sub(4);
        feedback.push("Give every education entry a year".to_string());
    }
    if s.skills.iter().any(|g| g.category.trim().is_empty()) {
        formatting = formatting.saturating_sub(3);
        feedback.push("Name every skill group".to_string());
    }

    // Quantified achievements
    let bullets: Vec<&str> = s
        .experience
        .iter()
        .flat_map(|e| e.achievements.iter())
        .chain(s.education.iter().flat_map(|e| e.achievements.iter()))
        .map(String::as_str)
        .chain(
            s.achievements
                .iter()
                .map(|a| a.description.as_deref().unwrap_or(&a.title)),
        )
        .collect();
    let quantified = bullets.iter().filter(|b| is_quantified(b)).count() as u32;
    let achievements = (quantified * 4).min(20);
    if quantified < bullets.len() as u32 {
        feedback.push(format!(
            "{} achievements lack numbers; add metrics such as %, counts or time saved",
            bullets.len() as u32 - quantified
        ));
    } else if bullets.is_empty() {
        feedback.push("Add achievements with measurable results".to_string());
    }

    // ATS compatibility
    let mut ats_compatibility = 0;
    if !info.email.trim().is_empty() {
        ats_compatibility += 5;
    } else {
        feedback.push("Add an email address".to_string());
    }
    if !info.phone.trim().is_empty() {
        ats_compatibility += 5;
    } else {
        feedback.push("Add a phone number".to_string());
    }
    if Template::from_id(&doc.template_id).is_some() {
        ats_compatibility += 5;
    }
    let untitled = s
        .experience
        .iter()
        .any(|e| e.title.trim().is_empty() || e.company.trim().is_empty())
        || s
            .education
            .iter()
            .any(|e| e.degree.trim().is_empty() || e.institution.trim().is_empty());
    if !untitled {
        ats_compatibility += 5;
    } else {
        feedback.push("Fill in titles and organisations for every entry".to_string());
    }

    QualityScore {
        overall_score: 0,
        breakdown: QualityBreakdown {
            content_completeness,
            keyword_optimization,
            formatting,
            achievements,
            ats_compatibility,
        },
        feedback,
    }
    .normalized()
}
