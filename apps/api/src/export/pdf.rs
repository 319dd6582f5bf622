//! `PdfExporter` backed by printpdf.
//!
//! Painting and file I/O are blocking, so both run inside `spawn_blocking`.
//! Files are written to a temp file in the output directory and persisted under
//! the final name, so a failed export never leaves a truncated PDF behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tempfile::NamedTempFile;
use tracing::info;

use crate::export::{ExportError, ExportedFile, PdfExporter};
use crate::layout::{FontFace, RenderedResume};
use crate::presentation::PresentationRegion;

const LAYER_NAME: &str = "Resume";

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_err(e: printpdf::Error) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Paints a rendered resume into PDF bytes using the base-14 Helvetica faces.
pub fn render_pdf(rendered: &RenderedResume) -> Result<Bytes, ExportError> {
    let width = pt_to_mm(rendered.page_width_pt);
    let height = pt_to_mm(rendered.page_height_pt);

    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("{} - Resume", rendered.name),
        width,
        height,
        LAYER_NAME,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (i, page) in rendered.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for line in &page.lines {
            let font = match line.style.face() {
                FontFace::Helvetica => &regular,
                FontFace::HelveticaBold => &bold,
            };
            // PDF user space grows upwards from the bottom-left corner.
            layer.use_text(
                line.text.clone(),
                line.size_pt,
                pt_to_mm(line.x_pt),
                pt_to_mm(rendered.page_height_pt - line.baseline_pt),
                font,
            );
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    Ok(Bytes::from(bytes))
}

/// Filesystem-safe file stem. Path separators and NULs are replaced so the
/// export can never leave `output_dir`.
fn file_stem(filename: &str) -> String {
    let stem: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            c => c,
        })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => "Resume".to_string(),
        _ => stem,
    }
}

fn write_atomically(dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.pdf"));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&path).map_err(|e| ExportError::Io(e.error))?;
    Ok(path)
}

/// Writes each export to `<output_dir>/<filename>.pdf`, replacing older files
/// with the same name.
pub struct PrintPdfExporter {
    output_dir: PathBuf,
}

impl PrintPdfExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl PdfExporter for PrintPdfExporter {
    async fn export(
        &self,
        region: &PresentationRegion,
        filename: &str,
    ) -> Result<ExportedFile, ExportError> {
        let rendered = region
            .snapshot()
            .ok_or_else(|| ExportError::EmptyRegion(region.id().to_string()))?;

        let dir = self.output_dir.clone();
        let stem = file_stem(filename);
        let pages = rendered.pages.len();

        let (path, size_bytes) = tokio::task::spawn_blocking(move || {
            let bytes = render_pdf(&rendered)?;
            let path = write_atomically(&dir, &stem, &bytes)?;
            Ok::<_, ExportError>((path, bytes.len()))
        })
        .await??;

        info!(
            "Exported '{}' ({} pages, {} bytes) to {}",
            filename,
            pages,
            size_bytes,
            path.display()
        );

        Ok(ExportedFile {
            filename: filename.to_string(),
            path,
            size_bytes,
            pages,
        })
    }
}
