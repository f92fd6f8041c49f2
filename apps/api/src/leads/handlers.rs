use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::leads::{Lead, LeadRequest};

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub status: &'static str,
    pub lead_id: Uuid,
}

/// POST /api/lead
pub async fn handle_capture_lead(
    Json(request): Json<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), AppError> {
    let lead = Lead::from_request(request)?;

    info!(
        target: "leads",
        lead_id = %lead.lead_id,
        email = %lead.email,
        name = lead.name.as_deref().unwrap_or(""),
        source = lead.source.as_deref().unwrap_or(""),
        received_at = %lead.received_at.to_rfc3339(),
        "Lead captured"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(LeadResponse {
            status: "ok",
            lead_id: lead.lead_id,
        }),
    ))
}
