// Cross-cutting prompt fragments shared by every advisor prompt.
// Request-specific templates live in advisor/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that receives a resume document.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Judge the resume only on the content it actually contains. \
    Do NOT invent experience, skills or achievements the candidate has not listed. \
    Suggestions must describe what to add or rephrase, never claim it already exists.";
