// Cross-cutting prompt fragments shared by every tailoring call.
// Endpoint-specific prompts live next to their handlers.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that sees the candidate's resume.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only use facts present in the resume text provided. \
    Do NOT invent employers, titles, dates, degrees, metrics or skills. \
    If the job description asks for something the resume does not show, \
    report it as missing instead of adding it.";
