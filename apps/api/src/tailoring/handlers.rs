//! Axum route handlers for the tailoring API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::normalize::normalize_text;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::state::AppState;
use crate::tailoring::prompts::{ANALYZE_SYSTEM, TAILOR_SYSTEM};
use crate::tailoring::{
    build_analyze_prompt, build_tailor_prompt, validate_input, AnalyzeRequest, RawAnalysis,
    ResumeAnalysis, TailorRequest,
};

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub text: String,
}

fn llm(state: &AppState) -> Result<&LlmClient, AppError> {
    state.llm.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("ANTHROPIC_API_KEY is not configured".to_string())
    })
}

/// POST /api/analyze
///
/// Scores a resume against a job description and lists matched and missing keywords.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    validate_input("resume_text", &request.resume_text)?;
    validate_input("job_description", &request.job_description)?;
    let llm = llm(&state)?;

    let prompt = format!(
        "{}\n\n{GROUNDING_INSTRUCTION}",
        build_analyze_prompt(&request.resume_text, &request.job_description)
    );
    let system = format!("{ANALYZE_SYSTEM} {JSON_ONLY_SYSTEM}");

    let raw: RawAnalysis = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;
    let analysis = ResumeAnalysis::from(raw);

    info!(
        match_score = analysis.match_score,
        missing = analysis.missing_keywords.len(),
        "Resume analyzed"
    );

    Ok(Json(analysis))
}

/// POST /api/tailor
///
/// Rewrites a resume for a job description and returns plain text.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    validate_input("resume_text", &request.resume_text)?;
    validate_input("job_description", &request.job_description)?;
    let llm = llm(&state)?;

    let prompt = format!(
        "{}\n\n{GROUNDING_INSTRUCTION}",
        build_tailor_prompt(
            &request.resume_text,
            &request.job_description,
            request.tone.as_deref(),
        )
    );

    let reply = llm
        .call_text(&prompt, TAILOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume tailoring failed: {e}")))?;
    let text = normalize_text(&reply);

    info!(chars = text.chars().count(), "Resume tailored");

    Ok(Json(TailorResponse { text }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::extraction::ExtractionConfig;
    use crate::routes::build_router;
    use crate::state::AppState;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let app = build_router(AppState::for_tests(ExtractionConfig::default()));
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_analyze_without_api_key_is_unavailable() {
        let (status, body) = post_json(
            "/api/analyze",
            json!({"resume_text": "Rust dev", "job_description": "Rust role"}),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_tailor_validates_before_llm_lookup() {
        let (status, body) = post_json(
            "/api/tailor",
            json!({"resume_text": "Rust dev", "job_description": "   "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["detail"].as_str().unwrap().contains("job_description"));
    }

    #[tokio::test]
    async fn test_tailor_rejects_get() {
        let app = build_router(AppState::for_tests(ExtractionConfig::default()));
        let request = Request::builder()
            .method("GET")
            .uri("/api/tailor")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
