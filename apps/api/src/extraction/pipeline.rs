//! Extraction pipeline: select → classify → decode → normalize.
//!
//! A pipeline is cheap to build and holds no mutable state; handlers build a
//! fresh one per request from `ExtractionConfig`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::extraction::decode::{DocxDecoder, PdfDecoder, TextDecoder};
use crate::extraction::form::{ParsedForm, UploadedFile};
use crate::extraction::format::{classify_format, file_extension, DocumentFormat};
use crate::extraction::normalize::normalize_text;
use crate::extraction::{ExtractError, ExtractionConfig};

/// Success body of `POST /api/extract`. `text` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub text: String,
}

pub struct ExtractionPipeline {
    config: ExtractionConfig,
    docx: Arc<dyn TextDecoder>,
    pdf: Arc<dyn TextDecoder>,
}

impl ExtractionPipeline {
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_decoders(config, Arc::new(DocxDecoder), Arc::new(PdfDecoder))
    }

    pub fn with_decoders(
        config: ExtractionConfig,
        docx: Arc<dyn TextDecoder>,
        pdf: Arc<dyn TextDecoder>,
    ) -> Self {
        Self { config, docx, pdf }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub async fn run(&self, form: ParsedForm) -> Result<ExtractionResult, ExtractError> {
        debug!(fields = ?form.field_names().collect::<Vec<_>>(), "Selecting upload");
        let file = form.select_file(&self.config.field_priority)?;

        let format = classify_format(file.original_filename(), file.mime_type()).ok_or_else(
            || ExtractError::Unsupported {
                extension: file.original_filename().and_then(file_extension),
                mime_type: file.mime_type().map(str::to_string),
            },
        )?;

        let raw = self.decode(format, &file).await?;
        let text = normalize_text(&raw);

        info!(
            filename = file.original_filename().unwrap_or("<unnamed>"),
            format = %format,
            chars = text.chars().count(),
            "Extracted document text"
        );

        Ok(ExtractionResult { text })
    }

    async fn decode(&self, format: DocumentFormat, file: &UploadedFile) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(file.path()).await?;

        let decoded = match format {
            DocumentFormat::Docx => self.docx.decode(bytes).await?,
            DocumentFormat::Pdf => self.pdf.decode(bytes).await?,
            DocumentFormat::Txt => Some(String::from_utf8_lossy(&bytes).into_owned()),
        };

        Ok(decoded.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use async_trait::async_trait;
    use tempfile::NamedTempFile;

    use super::*;

    /// Decoder double that ignores its input.
    struct FixedDecoder(Result<Option<&'static str>, &'static str>);

    #[async_trait]
    impl TextDecoder for FixedDecoder {
        async fn decode(&self, _bytes: Vec<u8>) -> Result<Option<String>, ExtractError> {
            match self.0 {
                Ok(text) => Ok(text.map(String::from)),
                Err(message) => Err(ExtractError::Decode {
                    format: DocumentFormat::Docx,
                    message: message.to_string(),
                }),
            }
        }
    }

    fn pipeline(docx: FixedDecoder, pdf: FixedDecoder) -> ExtractionPipeline {
        ExtractionPipeline::with_decoders(ExtractionConfig::default(), Arc::new(docx), Arc::new(pdf))
    }

    fn form_with(field: &str, contents: &[u8], filename: Option<&str>, mime: Option<&str>) -> ParsedForm {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents).unwrap();
        let mut form = ParsedForm::default();
        form.push(
            field,
            UploadedFile::from_temp(temp, filename.map(String::from), mime.map(String::from)),
        );
        form
    }

    #[tokio::test]
    async fn test_txt_tab_is_normalized() {
        let form = form_with("resume", b"Hello\tWorld", Some("resume.txt"), Some("text/plain"));
        let result = ExtractionPipeline::new(ExtractionConfig::default())
            .run(form)
            .await
            .unwrap();
        assert_eq!(result.text, "Hello World");
    }

    #[tokio::test]
    async fn test_docx_carriage_returns_removed() {
        let form = form_with("file", b"PK", Some("cv.docx"), None);
        let result = pipeline(
            FixedDecoder(Ok(Some("Line one\r\n\r\nLine two"))),
            FixedDecoder(Ok(None)),
        )
        .run(form)
        .await
        .unwrap();
        assert_eq!(result.text, "Line one\n\nLine two");
    }

    #[tokio::test]
    async fn test_decoder_null_result_is_empty_text() {
        let form = form_with("file", b"PK", Some("cv.docx"), None);
        let result = pipeline(FixedDecoder(Ok(None)), FixedDecoder(Ok(None)))
            .run(form)
            .await
            .unwrap();
        assert_eq!(result.text, "");
    }

    #[tokio::test]
    async fn test_empty_txt_is_success() {
        let form = form_with("file", b"", Some("empty.txt"), None);
        let result = ExtractionPipeline::new(ExtractionConfig::default())
            .run(form)
            .await
            .unwrap();
        assert_eq!(result, ExtractionResult { text: String::new() });
    }

    #[tokio::test]
    async fn test_mime_fallback_dispatches_to_pdf_decoder() {
        let form = form_with("upload", b"%PDF", Some("resume"), Some("application/pdf"));
        let result = pipeline(
            FixedDecoder(Ok(Some("docx text"))),
            FixedDecoder(Ok(Some("  pdf\u{00A0}\u{00A0}text  "))),
        )
        .run(form)
        .await
        .unwrap();
        assert_eq!(result.text, "pdf text");
    }

    #[tokio::test]
    async fn test_unsupported_format_reports_extension_and_mime() {
        let form = form_with("file", b"??", Some("photo.xyz"), Some("application/octet-stream"));
        let err = ExtractionPipeline::new(ExtractionConfig::default())
            .run(form)
            .await
            .unwrap_err();
        match err {
            ExtractError::Unsupported { extension, mime_type } => {
                assert_eq!(extension.as_deref(), Some("xyz"));
                assert_eq!(mime_type.as_deref(), Some("application/octet-stream"));
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decoder_failure_propagates() {
        let form = form_with("file", b"PK", Some("cv.docx"), None);
        let err = pipeline(FixedDecoder(Err("bad zip")), FixedDecoder(Ok(None)))
            .run(form)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_txt_is_lossy() {
        let form = form_with("file", b"caf\xE9 au lait", Some("menu.txt"), None);
        let result = ExtractionPipeline::new(ExtractionConfig::default())
            .run(form)
            .await
            .unwrap();
        assert_eq!(result.text, "caf\u{FFFD} au lait");
    }

    #[tokio::test]
    async fn test_empty_form_is_no_file() {
        let err = ExtractionPipeline::new(ExtractionConfig::default())
            .run(ParsedForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoFile { .. }));
    }
}
