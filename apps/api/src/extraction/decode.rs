//! Format-specific decoders that turn document bytes into raw text.

use async_trait::async_trait;
use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::extraction::format::DocumentFormat;
use crate::extraction::ExtractError;

/// Decodes a binary document into raw (un-normalized) text.
///
/// `Ok(None)` means the document was valid but exposed no text value; the
/// pipeline treats that as empty text rather than as a failure.
#[async_trait]
pub trait TextDecoder: Send + Sync {
    async fn decode(&self, bytes: Vec<u8>) -> Result<Option<String>, ExtractError>;
}

/// Word (`.docx`) decoder backed by `docx-rs`.
pub struct DocxDecoder;

#[async_trait]
impl TextDecoder for DocxDecoder {
    async fn decode(&self, bytes: Vec<u8>) -> Result<Option<String>, ExtractError> {
        run_blocking(DocumentFormat::Docx, move || docx_text(&bytes)).await
    }
}

/// PDF decoder backed by `pdf-extract`.
pub struct PdfDecoder;

#[async_trait]
impl TextDecoder for PdfDecoder {
    async fn decode(&self, bytes: Vec<u8>) -> Result<Option<String>, ExtractError> {
        run_blocking(DocumentFormat::Pdf, move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map(Some)
                .map_err(|e| e.to_string())
        })
        .await
    }
}

/// Runs a CPU-bound decoder on the blocking pool. Decoder panics surface as
/// `ExtractError::Decode` instead of tearing down the request task.
async fn run_blocking<F>(format: DocumentFormat, job: F) -> Result<Option<String>, ExtractError>
where
    F: FnOnce() -> Result<Option<String>, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(|message| ExtractError::Decode { format, message }),
        Err(join_err) => Err(ExtractError::Decode {
            format,
            message: format!("decoder aborted: {join_err}"),
        }),
    }
}

/// Raw text of a `.docx` body: one block per paragraph, each followed by a
/// blank line. Paragraphs inside table cells are emitted the same way, row by
/// row. Returns `None` when the body holds no paragraphs at all.
pub fn docx_text(bytes: &[u8]) -> Result<Option<String>, String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| e.to_string())?;

    let mut text = DocxText::default();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => text.paragraph(paragraph),
            DocumentChild::Table(table) => text.table(table),
            _ => {}
        }
    }

    Ok(text.finish())
}

#[derive(Default)]
struct DocxText {
    out: String,
    paragraphs: usize,
}

impl DocxText {
    fn paragraph(&mut self, paragraph: &Paragraph) {
        self.paragraphs += 1;
        append_paragraph_children(&paragraph.children, &mut self.out);
        self.out.push_str("\n\n");
    }

    fn table(&mut self, table: &Table) {
        for TableChild::TableRow(row) in &table.rows {
            for TableRowChild::TableCell(cell) in &row.cells {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(paragraph) => self.paragraph(paragraph),
                        TableCellContent::Table(nested) => self.table(nested),
                        _ => {}
                    }
                }
            }
        }
    }

    fn finish(self) -> Option<String> {
        (self.paragraphs > 0).then_some(self.out)
    }
}

fn append_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => append_run(run, out),
            // Contact details on resumes are usually hyperlinked.
            ParagraphChild::Hyperlink(link) => append_paragraph_children(&link.children, out),
            // Tracked insertions are part of the visible text.
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        append_run(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn append_run(run: &Run, out: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
