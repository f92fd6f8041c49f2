//! Multipart form intake: spools file parts to temporary files and picks the
//! single upload the pipeline will read.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::extraction::ExtractError;

/// A file part stored on disk by the form parser.
///
/// The backing temporary file is removed when the value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
    original_filename: Option<String>,
    mime_type: Option<String>,
    _temp: Option<NamedTempFile>,
}

impl UploadedFile {
    pub fn from_temp(
        temp: NamedTempFile,
        original_filename: Option<String>,
        mime_type: Option<String>,
    ) -> Self {
        Self {
            path: temp.path().to_path_buf(),
            original_filename,
            mime_type,
            _temp: Some(temp),
        }
    }

    /// An entry pointing at a path this value does not own.
    #[cfg(test)]
    pub fn at_path(
        path: impl Into<PathBuf>,
        original_filename: Option<&str>,
        mime_type: Option<&str>,
    ) -> Self {
        Self {
            path: path.into(),
            original_filename: original_filename.map(String::from),
            mime_type: mime_type.map(String::from),
            _temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_filename(&self) -> Option<&str> {
        self.original_filename.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn is_readable(&self) -> bool {
        self.path.is_file()
    }
}

/// File parts keyed by field name, in the order each name first appeared.
#[derive(Debug, Default)]
pub struct ParsedForm {
    fields: Vec<(String, Vec<UploadedFile>)>,
}

impl ParsedForm {
    pub fn push(&mut self, name: impl Into<String>, file: UploadedFile) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, files)) => files.push(file),
            None => self.fields.push((name, vec![file])),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Takes exactly one upload out of the form.
    ///
    /// Named fields are tried in `priority` order; otherwise the first field
    /// the parser produced is used. Within a field the first file wins. The
    /// remaining files are dropped (and their temp files deleted) here.
    pub fn select_file(self, priority: &[String]) -> Result<UploadedFile, ExtractError> {
        let mut fields = self.fields;

        let index = priority
            .iter()
            .find_map(|wanted| {
                fields
                    .iter()
                    .position(|(name, files)| name == wanted && !files.is_empty())
            })
            .or_else(|| fields.iter().position(|(_, files)| !files.is_empty()));

        index
            .and_then(|i| fields.swap_remove(i).1.into_iter().next())
            .filter(UploadedFile::is_readable)
            .ok_or_else(|| ExtractError::NoFile {
                searched: priority.to_vec(),
            })
    }
}

/// Accepts `multipart/form-data` with any parameters, case-insensitively.
pub fn ensure_multipart(content_type: &str) -> Result<(), ExtractError> {
    let is_multipart = content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data");

    if is_multipart {
        Ok(())
    } else {
        Err(ExtractError::WrongContentType {
            content_type: content_type.to_string(),
        })
    }
}

/// Streams every file part of the body to its own temporary file.
///
/// Parts without a filename are plain form values and are skipped. A part
/// larger than `max_file_bytes` aborts the whole parse.
pub async fn parse_multipart(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<ParsedForm, ExtractError> {
    let mut form = ParsedForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, max_file_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!(field = %name, "Skipping non-file form field");
            continue;
        };
        let mime_type = field.content_type().map(str::to_string);

        let (temp, mut sink) = create_spool_file().await?;
        let mut written = 0usize;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| form_error(e, max_file_bytes))?
        {
            written += chunk.len();
            if written > max_file_bytes {
                return Err(ExtractError::TooLarge {
                    limit: max_file_bytes,
                });
            }
            sink.write_all(&chunk).await?;
        }
        sink.flush().await?;

        debug!(field = %name, filename = %filename, bytes = written, "Stored uploaded file");

        let original_filename = Some(filename).filter(|f| !f.is_empty());
        form.push(name, UploadedFile::from_temp(temp, original_filename, mime_type));
    }

    Ok(form)
}

/// Creates the temp file a part is streamed into, plus an async handle on it.
/// Both steps touch the filesystem synchronously, so they run on the blocking pool.
async fn create_spool_file() -> Result<(NamedTempFile, tokio::fs::File), ExtractError> {
    let (temp, file) = tokio::task::spawn_blocking(|| -> std::io::Result<_> {
        let temp = NamedTempFile::new()?;
        let file = temp.reopen()?;
        Ok((temp, file))
    })
    .await
    .map_err(std::io::Error::other)??;

    Ok((temp, tokio::fs::File::from_std(file)))
}

fn form_error(err: MultipartError, limit: usize) -> ExtractError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractError::TooLarge { limit }
    } else {
        ExtractError::MalformedForm(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_upload(contents: &str, filename: &str) -> UploadedFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        UploadedFile::from_temp(temp, Some(filename.to_string()), None)
    }

    fn priority() -> Vec<String> {
        vec!["file".into(), "resume".into(), "upload".into()]
    }

    #[test]
    fn test_file_field_beats_resume_field() {
        let mut form = ParsedForm::default();
        form.push("resume", temp_upload("from resume", "b.txt"));
        form.push("file", temp_upload("from file", "a.txt"));

        let selected = form.select_file(&priority()).unwrap();
        assert_eq!(selected.original_filename(), Some("a.txt"));
    }

    #[test]
    fn test_priority_order_resume_before_upload() {
        let mut form = ParsedForm::default();
        form.push("upload", temp_upload("u", "u.txt"));
        form.push("resume", temp_upload("r", "r.txt"));

        let selected = form.select_file(&priority()).unwrap();
        assert_eq!(selected.original_filename(), Some("r.txt"));
    }

    #[test]
    fn test_falls_back_to_first_field_in_parser_order() {
        let mut form = ParsedForm::default();
        form.push("document", temp_upload("d", "d.txt"));
        form.push("attachment", temp_upload("x", "x.txt"));

        let selected = form.select_file(&priority()).unwrap();
        assert_eq!(selected.original_filename(), Some("d.txt"));
    }

    #[test]
    fn test_first_value_of_repeated_field() {
        let mut form = ParsedForm::default();
        form.push("file", temp_upload("1", "first.txt"));
        form.push("file", temp_upload("2", "second.txt"));
        assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["file"]);

        let selected = form.select_file(&priority()).unwrap();
        assert_eq!(selected.original_filename(), Some("first.txt"));
    }

    #[test]
    fn test_empty_form_is_no_file() {
        let form = ParsedForm::default();
        assert_eq!(form.field_names().count(), 0);
        let err = form.select_file(&priority()).unwrap_err();
        assert!(matches!(err, ExtractError::NoFile { ref searched } if searched.len() == 3));
    }

    #[test]
    fn test_unreadable_location_is_no_file() {
        let mut form = ParsedForm::default();
        form.push(
            "file",
            UploadedFile::at_path("/nonexistent/upload-0001", Some("a.txt"), None),
        );
        assert!(matches!(
            form.select_file(&priority()),
            Err(ExtractError::NoFile { .. })
        ));
    }

    #[test]
    fn test_unselected_temp_files_are_removed() {
        let mut form = ParsedForm::default();
        let loser = temp_upload("r", "r.txt");
        let loser_path = loser.path().to_path_buf();
        form.push("resume", loser);
        form.push("file", temp_upload("f", "f.txt"));

        let _selected = form.select_file(&priority()).unwrap();
        assert!(!loser_path.exists());
    }

    #[tokio::test]
    async fn test_spool_file_writes_through_to_temp_path() {
        let (temp, mut sink) = create_spool_file().await.unwrap();
        sink.write_all(b"Jane Doe").await.unwrap();
        sink.flush().await.unwrap();

        let upload = UploadedFile::from_temp(temp, Some("cv.txt".into()), None);
        assert!(upload.is_readable());
        assert_eq!(std::fs::read(upload.path()).unwrap(), b"Jane Doe");
    }

    #[test]
    fn test_ensure_multipart() {
        assert!(ensure_multipart("multipart/form-data; boundary=abc").is_ok());
        assert!(ensure_multipart("Multipart/Form-Data; boundary=abc").is_ok());
        assert!(matches!(
            ensure_multipart("application/json"),
            Err(ExtractError::WrongContentType { .. })
        ));
        assert!(ensure_multipart("").is_err());
        assert!(ensure_multipart("multipart/mixed; boundary=abc").is_err());
    }
}
