use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};

use crate::errors::AppError;
use crate::extraction::form::{ensure_multipart, parse_multipart};
use crate::extraction::pipeline::{ExtractionPipeline, ExtractionResult};
use crate::extraction::ExtractError;
use crate::state::AppState;

/// POST /api/extract
///
/// Accepts one uploaded resume (docx, pdf or txt) and returns its normalized text.
/// The content type is checked before any of the body is read.
pub async fn handle_extract(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ExtractionResult>, AppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    ensure_multipart(&content_type)?;

    let multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| ExtractError::MalformedForm(e.body_text()))?;

    let pipeline = ExtractionPipeline::new(state.config.extraction.clone());
    let form = parse_multipart(multipart, pipeline.config().max_file_bytes).await?;
    let result = pipeline.run(form).await?;

    Ok(Json(result))
}
