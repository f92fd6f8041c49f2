// Document text extraction: multipart upload → file selection → format
// classification → decoder dispatch → whitespace normalization.

pub mod decode;
pub mod form;
pub mod format;
pub mod handlers;
pub mod normalize;
pub mod pipeline;

use thiserror::Error;

use crate::errors::AppError;
use crate::extraction::format::DocumentFormat;

/// Per-file upload ceiling used when `MAX_UPLOAD_BYTES` is not set (8 MiB).
pub const DEFAULT_MAX_FILE_BYTES: usize = 8 * 1024 * 1024;

/// Form fields searched for the upload, in priority order.
pub const DEFAULT_FIELD_PRIORITY: [&str; 3] = ["file", "resume", "upload"];

/// Slack on top of the file ceiling for boundaries, headers and small text parts.
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub max_file_bytes: usize,
    pub field_priority: Vec<String>,
}

impl ExtractionConfig {
    /// Upper bound on the whole request body for the extraction route.
    pub fn body_limit(&self) -> usize {
        self.max_file_bytes.saturating_add(FORM_OVERHEAD_BYTES)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            field_priority: DEFAULT_FIELD_PRIORITY
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected multipart/form-data, got '{content_type}'")]
    WrongContentType { content_type: String },

    #[error("could not parse multipart body: {0}")]
    MalformedForm(String),

    #[error("uploaded file exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("no file uploaded; searched fields {} then any file field", .searched.join(", "))]
    NoFile { searched: Vec<String> },

    #[error(
        "unsupported file type (extension: {}, mime type: {}); expected .docx, .pdf or .txt",
        .extension.as_deref().unwrap_or("none"),
        .mime_type.as_deref().unwrap_or("none")
    )]
    Unsupported {
        extension: Option<String>,
        mime_type: Option<String>,
    },

    #[error("{format} decoder failed: {message}")]
    Decode {
        format: DocumentFormat,
        message: String,
    },

    #[error("could not read uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        let detail = err.to_string();
        match err {
            ExtractError::WrongContentType { .. } => AppError::WrongContentType(detail),
            ExtractError::MalformedForm(_) => AppError::MalformedForm(detail),
            ExtractError::TooLarge { .. } => AppError::PayloadTooLarge(detail),
            ExtractError::NoFile { .. } => AppError::NoFile(detail),
            ExtractError::Unsupported { .. } => AppError::UnsupportedMediaType(detail),
            ExtractError::Decode { .. } | ExtractError::Io(_) => AppError::Extraction(detail),
        }
    }
}
