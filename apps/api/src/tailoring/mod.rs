//! Resume tailoring: LLM-backed analysis and rewriting of a resume against a
//! job description. Input validation and prompt assembly live here; the
//! handlers only wire them to `LlmClient`.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::tailoring::prompts::{ANALYZE_PROMPT_TEMPLATE, TAILOR_PROMPT_TEMPLATE};

/// Longest resume or job description accepted, in characters.
pub const MAX_INPUT_CHARS: usize = 60_000;

const DEFAULT_TONE: &str = "professional";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
    pub tone: Option<String>,
}

/// Structured fit analysis returned by `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub match_score: u8,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// Shape the model is asked to produce. The score is taken loosely because
/// models occasionally answer with a float or an out-of-range value.
#[derive(Debug, Deserialize)]
pub struct RawAnalysis {
    pub match_score: f64,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl From<RawAnalysis> for ResumeAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        let score = if raw.match_score.is_finite() {
            raw.match_score.round().clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            match_score: score as u8,
            matched_keywords: raw.matched_keywords,
            missing_keywords: raw.missing_keywords,
            strengths: raw.strengths,
            suggestions: raw.suggestions,
            summary: raw.summary.trim().to_string(),
        }
    }
}

/// Rejects blank or oversized text for the named field.
pub fn validate_input(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    let chars = value.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(AppError::Validation(format!(
            "{field} is {chars} characters; the limit is {MAX_INPUT_CHARS}"
        )));
    }
    Ok(())
}

pub fn build_analyze_prompt(resume_text: &str, job_description: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description.trim())
        .replace("{resume_text}", resume_text.trim())
}

pub fn build_tailor_prompt(resume_text: &str, job_description: &str, tone: Option<&str>) -> String {
    let tone = tone
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TONE);
    TAILOR_PROMPT_TEMPLATE
        .replace("{tone}", tone)
        .replace("{job_description}", job_description.trim())
        .replace("{resume_text}", resume_text.trim())
}
