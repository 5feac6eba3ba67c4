//! PDF text-layer extraction.

mod extractor;

pub use extractor::PdfExtractor;

use tracing::debug;

use crate::error::PdfError;

/// Whether a PDF carries usable embedded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// No text layer, or too little to parse (scanned document).
    Empty,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Whether the PDF carries a text layer.
    pub pdf_type: PdfType,
    /// Extracted text (may be empty).
    pub text: String,
    /// Number of pages.
    pub page_count: u32,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text and classify the loaded document.
    fn content(&self, min_text_length: usize) -> Result<PdfContent> {
        let text = self.extract_text()?;
        let pdf_type = if text.trim().len() >= min_text_length {
            PdfType::Text
        } else {
            PdfType::Empty
        };

        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            self.page_count(),
            text.len(),
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text,
            page_count: self.page_count(),
        })
    }
}
