//! Lead capture: contact details submitted from the landing page are
//! validated and written to the log. Nothing is stored.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_EMAIL_CHARS: usize = 254;
const MAX_FIELD_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct LeadRequest {
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
}

/// A validated lead as it is written to the log.
#[derive(Debug, Clone)]
pub struct Lead {
    pub lead_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl Lead {
    pub fn from_request(request: LeadRequest) -> Result<Self, AppError> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;

        Ok(Self {
            lead_id: Uuid::new_v4(),
            email,
            name: clean_optional(request.name),
            source: clean_optional(request.source),
            received_at: Utc::now(),
        })
    }
}

/// Structural check only: one `@`, a non-empty local part, a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation(format!("'{email}' is not a valid email address"));

    if email.is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if email.chars().count() > MAX_EMAIL_CHARS || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');

    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }
    Ok(())
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().chars().take(MAX_FIELD_CHARS).collect::<String>())
        .filter(|v| !v.is_empty())
}
