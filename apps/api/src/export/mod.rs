//! PDF export — captures the preview region and writes it out as a PDF file.

pub mod pdf;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::presentation::{PresentationError, PresentationRegion};

pub use pdf::{render_pdf, PrintPdfExporter};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("region '{0}' has nothing rendered")]
    EmptyRegion(String),

    #[error("region shows index {shown} but index {expected} was requested")]
    StaleRender { expected: usize, shown: usize },

    #[error("presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A PDF written by an exporter.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    /// Filename without extension, as requested by the caller.
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: usize,
    pub pages: usize,
}

/// Turns whatever `region` currently shows into a PDF named `filename` (no extension).
#[async_trait]
pub trait PdfExporter: Send + Sync {
    async fn export(
        &self,
        region: &PresentationRegion,
        filename: &str,
    ) -> Result<ExportedFile, ExportError>;
}

/// Export filename for a resume holder: every whitespace run becomes one `_`,
/// then `_Resume` is appended. "Jane A. Doe" → "Jane_A._Doe_Resume".
pub fn export_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 7);
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out.push_str("_Resume");
    out
}
