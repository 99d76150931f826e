// Prompt templates for the LLM advisor backend.
// Placeholders in `{braces}` are replaced before sending.

/// Role description; `JSON_ONLY_SYSTEM` is appended when sending.
pub const ADVISOR_ROLE: &str = "You are an experienced campus placement officer and \
    resume reviewer helping students prepare for job applications.";

/// Replace `{resume_json}` and `{job_json}`.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Compare the resume below with the job posting and assess how well they match.

Return a JSON object with this EXACT schema (no extra fields):
{
  "matchScore": 0,
  "matchedSkills": ["skills the posting asks for that the resume shows"],
  "missingSkills": ["skills the posting asks for that the resume lacks"],
  "improvements": ["concrete edits that would strengthen the resume for this job"],
  "atsOptimization": ["keyword and formatting changes for applicant tracking systems"]
}

matchScore is an integer from 0 to 100.

RESUME:
{resume_json}

JOB POSTING:
{job_json}
"#;

/// Replace `{job_title}` and `{job_description}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"List the skills a candidate should highlight for the role below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "technicalSkills": ["..."],
  "softSkills": ["..."]
}

Keep each list under 12 items, most important first.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}
"#;

/// Replace `{resume_json}`.
pub const QUALITY_PROMPT_TEMPLATE: &str = r#"Score the quality of the resume below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "overallScore": 0,
  "breakdown": {
    "contentCompleteness": 0,
    "keywordOptimization": 0,
    "formatting": 0,
    "achievements": 0,
    "atsCompatibility": 0
  },
  "feedback": ["specific, actionable feedback"]
}

Each breakdown score is an integer from 0 to 20. overallScore is their sum.

RESUME:
{resume_json}
"#;
