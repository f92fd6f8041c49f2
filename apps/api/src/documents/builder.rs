use std::io::Cursor;

use anyhow::{Context, Result};
use docx_rs::{Docx, Paragraph, Run};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DEFAULT_FILENAME: &str = "resume";
const MAX_FILENAME_CHARS: usize = 80;

// docx sizes are in half-points.
const NAME_SIZE: usize = 32;
const HEADING_SIZE: usize = 24;
const BODY_SIZE: usize = 21;

const BULLET_MARKERS: [&str; 3] = ["- ", "* ", "• "];

/// How a single non-empty input line is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Name(&'a str),
    Heading(&'a str),
    Bullet(&'a str),
    Body(&'a str),
}

fn classify_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                Line::Name(line)
            } else if let Some(rest) = strip_bullet(line) {
                Line::Bullet(rest)
            } else if is_heading(line) {
                Line::Heading(line)
            } else {
                Line::Body(line)
            }
        })
        .collect()
}

fn strip_bullet(line: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim_start)
}

/// A heading is a line with letters, all of them upper-case ("EXPERIENCE", "SKILLS & TOOLS").
fn is_heading(line: &str) -> bool {
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

fn paragraph(line: &Line<'_>) -> Paragraph {
    match line {
        Line::Name(text) => {
            Paragraph::new().add_run(Run::new().add_text(*text).bold().size(NAME_SIZE))
        }
        Line::Heading(text) => {
            Paragraph::new().add_run(Run::new().add_text(*text).bold().size(HEADING_SIZE))
        }
        Line::Bullet(text) => Paragraph::new()
            .add_run(Run::new().add_text(format!("• {text}")).size(BODY_SIZE)),
        Line::Body(text) => Paragraph::new().add_run(Run::new().add_text(*text).size(BODY_SIZE)),
    }
}

/// Renders resume text into `.docx` bytes, one paragraph per non-empty line.
pub fn build_resume_docx(text: &str) -> Result<Vec<u8>> {
    let docx = classify_lines(text)
        .iter()
        .fold(Docx::new(), |docx, line| docx.add_paragraph(paragraph(line)));

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .context("Failed to pack docx archive")?;
    Ok(buf.into_inner())
}

/// Reduces a client-supplied name to `[A-Za-z0-9._-]` and appends `.docx`.
pub fn sanitize_filename(requested: Option<&str>) -> String {
    let stem: String = requested
        .unwrap_or_default()
        .trim()
        .trim_end_matches(".docx")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_CHARS)
        .collect();
    let stem = stem.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        format!("{DEFAULT_FILENAME}.docx")
    } else {
        format!("{stem}.docx")
    }
}
