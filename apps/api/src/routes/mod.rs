pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::leads::handlers as leads;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.extraction.body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/extract",
            post(extraction::handle_extract)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/analyze",
            post(tailoring::handle_analyze).fallback(method_not_allowed),
        )
        .route(
            "/api/tailor",
            post(tailoring::handle_tailor).fallback(method_not_allowed),
        )
        .route(
            "/api/docx",
            post(documents::handle_build_docx).fallback(method_not_allowed),
        )
        .route(
            "/api/lead",
            post(leads::handle_capture_lead).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}
