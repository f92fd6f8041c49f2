//! Word document generation from plain resume text.

pub mod builder;
pub mod handlers;

pub use builder::{build_resume_docx, sanitize_filename, DOCX_CONTENT_TYPE};
