//! Text extraction for uploaded resumes.
//!
//! PDFs go through `pdf-extract`; every other content type is decoded as UTF-8,
//! replacing invalid sequences.

use thiserror::Error;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),
}

/// Returns the plain text of an uploaded document.
/// `content_type` may carry parameters (`application/pdf; name=cv.pdf`).
pub fn extract_text(data: &[u8], content_type: Option<&str>) -> Result<String, ExtractionError> {
    if is_pdf(content_type) {
        pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))
    } else {
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}
