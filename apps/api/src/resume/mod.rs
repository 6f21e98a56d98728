//! Resume extractor: turns an uploaded PDF into plain text for the question prompt.
//!
//! Text is extracted page by page with `pdf-extract`; pages that yield no text
//! are skipped and the rest are concatenated in page order.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

#[cfg(test)]
pub mod fixture;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("Could not extract text from PDF: {0}")]
    Extraction(String),
}

/// Extracts resume text on the blocking pool. `pdf-extract` is synchronous and
/// can panic on malformed documents; a panic surfaces as `ResumeError::Extraction`.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, ResumeError> {
    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&pdf))
        .await
        .map_err(|e| ResumeError::Extraction(format!("extractor aborted: {e}")))??;

    info!(
        "Extracted {} characters of resume text from {} byte PDF",
        text.len(),
        size
    );
    Ok(text)
}

/// Synchronous extraction: validates the PDF header, then joins non-empty pages.
pub fn extract_text_from_pdf(pdf: &[u8]) -> Result<String, ResumeError> {
    if !looks_like_pdf(pdf) {
        return Err(ResumeError::NotPdf);
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| ResumeError::Extraction(e.to_string()))?;

    debug!("PDF has {} pages", pages.len());
    Ok(join_pages(&pages))
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    // Some generators emit leading whitespace or a BOM before the header.
    bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| bytes[start..].starts_with(PDF_MAGIC))
        .unwrap_or(false)
}

/// Concatenates page texts, skipping pages with no extractable text.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(String::as_str)
        .collect()
}
