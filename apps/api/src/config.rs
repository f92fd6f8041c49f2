use anyhow::{ensure, Context, Result};

use crate::extraction::{ExtractionConfig, DEFAULT_FIELD_PRIORITY, DEFAULT_MAX_FILE_BYTES};

/// Application configuration loaded from environment variables.
/// Every variable has a default; `ANTHROPIC_API_KEY` only gates the LLM endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub extraction: ExtractionConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_file_bytes = match optional_env("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_max_upload_bytes(&raw)?,
            None => DEFAULT_MAX_FILE_BYTES,
        };

        let field_priority = optional_env("UPLOAD_FIELDS")
            .map(|raw| parse_field_list(&raw))
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_FIELD_PRIORITY
                    .iter()
                    .map(|f| f.to_string())
                    .collect()
            });

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            extraction: ExtractionConfig {
                max_file_bytes,
                field_priority,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_max_upload_bytes(raw: &str) -> Result<usize> {
    let limit = raw
        .parse::<usize>()
        .context("MAX_UPLOAD_BYTES must be a positive integer")?;
    ensure!(limit > 0, "MAX_UPLOAD_BYTES must be a positive integer, got 0");
    Ok(limit)
}

fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_field_list(" resume , ,file,"),
            vec!["resume".to_string(), "file".to_string()]
        );
    }

    #[test]
    fn test_parse_field_list_empty_input() {
        assert!(parse_field_list("  ").is_empty());
    }

    #[test]
    fn test_max_upload_bytes_accepts_positive_value() {
        assert_eq!(parse_max_upload_bytes("1048576").unwrap(), 1_048_576);
    }

    #[test]
    fn test_max_upload_bytes_rejects_zero() {
        let err = parse_max_upload_bytes("0").unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn test_max_upload_bytes_rejects_non_numeric() {
        assert!(parse_max_upload_bytes("8MB").is_err());
        assert!(parse_max_upload_bytes("-1").is_err());
    }
}
