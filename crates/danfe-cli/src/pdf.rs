//! Document text ingestion.
//!
//! The engine consumes already-produced page text; this module is the
//! collaborator that produces it. PDFs go through embedded-text extraction
//! (page texts newline-joined in page order); `.txt` files are read as-is,
//! which covers pre-extracted text and test fixtures. Scanned PDFs without
//! embedded text are reported as unreadable.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

use danfe_core::models::config::PdfConfig;

/// Errors raised while turning a file into document text.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// No usable embedded text (likely a scanned document).
    #[error("no embedded text found (scanned document?)")]
    NoText,

    /// Not a file type this tool reads.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Read one document into an `(identifier, full_text)` pair.
///
/// The identifier is the file name, which becomes the `arquivo` provenance
/// on every extracted record.
pub fn read_document(path: &Path, config: &PdfConfig) -> Result<(String, String)> {
    let identifier = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => extract_pdf_text(path, config)?,
        "txt" => std::fs::read_to_string(path)?,
        other => return Err(PdfError::UnsupportedFormat(other.to_string())),
    };

    if text.trim().len() < config.min_text_length {
        return Err(PdfError::NoText);
    }

    Ok((identifier, text))
}

fn extract_pdf_text(path: &Path, config: &PdfConfig) -> Result<String> {
    let document = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;
    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }
    debug!(path = %path.display(), pages = page_count, "loaded PDF");

    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    let limit = if config.max_pages == 0 {
        pages.len()
    } else {
        config.max_pages.min(pages.len())
    };

    Ok(pages[..limit].join("\n"))
}
