use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::documents::{build_resume_docx, sanitize_filename, DOCX_CONTENT_TYPE};
use crate::errors::AppError;

/// Longest text accepted for rendering, in characters.
const MAX_DOCX_TEXT_CHARS: usize = 100_000;

#[derive(Debug, Deserialize)]
pub struct BuildDocxRequest {
    pub text: String,
    pub filename: Option<String>,
}

/// POST /api/docx
///
/// Renders resume text into a downloadable Word document.
pub async fn handle_build_docx(Json(request): Json<BuildDocxRequest>) -> Result<Response, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    if request.text.chars().count() > MAX_DOCX_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "text exceeds {MAX_DOCX_TEXT_CHARS} characters"
        )));
    }

    let filename = sanitize_filename(request.filename.as_deref());
    let text = request.text;
    let bytes = tokio::task::spawn_blocking(move || build_resume_docx(&text))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    info!(filename = %filename, bytes = bytes.len(), "Built docx");

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
