//! Upload format classification from weak client-supplied signals.

use std::fmt;
use std::path::Path;

/// Document formats the pipeline can turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Pdf,
    Txt,
}

impl DocumentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Txt => "txt",
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "docx" => Some(DocumentFormat::Docx),
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }

    fn from_mime_type(mime_type: &str) -> Option<Self> {
        if mime_type.contains("wordprocessingml") {
            Some(DocumentFormat::Docx)
        } else if mime_type.contains("pdf") {
            Some(DocumentFormat::Pdf)
        } else if mime_type.starts_with("text/") {
            Some(DocumentFormat::Txt)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased extension of `filename` without the leading dot.
/// Dotfiles such as `.pdf` have no extension.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Resolves the format of an upload.
///
/// The filename extension wins; the MIME type is consulted only when the
/// extension is missing or unrecognised. `None` means unsupported.
pub fn classify_format(filename: Option<&str>, mime_type: Option<&str>) -> Option<DocumentFormat> {
    filename
        .and_then(file_extension)
        .and_then(|ext| DocumentFormat::from_extension(&ext))
        .or_else(|| {
            mime_type
                .map(str::to_lowercase)
                .and_then(|mime| DocumentFormat::from_mime_type(&mime))
        })
}
