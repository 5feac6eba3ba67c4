//! Error types for the efaktur-core library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the efaktur library.
#[derive(Error, Debug)]
pub enum EfakturError {
    /// The declared extension is not one the adapters accept.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The artifact does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The artifact exists but has zero length.
    #[error("file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    /// The authoritative record could not be fetched or parsed.
    #[error("reference unavailable: {0}")]
    ReferenceUnavailable(#[from] ReferenceError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// No OCR engine is available in this build.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while retrieving the authoritative record.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// Transport-level failure.
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The payload is not well-formed markup.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The payload parsed but is not a validation document.
    #[error("unexpected document root: {0}")]
    UnexpectedDocument(String),
}

/// Coarse classification used when reporting a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The submitted artifact violated the adapter contract.
    Client,
    /// The reference provider could not be reached or understood.
    Upstream,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    /// HTTP-equivalent status code for this class.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorClass::Client => 400,
            ErrorClass::Upstream => 502,
            ErrorClass::Internal => 500,
        }
    }
}

impl EfakturError {
    /// Classify this error for reporting.
    pub fn class(&self) -> ErrorClass {
        match self {
            EfakturError::UnsupportedFormat(_)
            | EfakturError::NotFound(_)
            | EfakturError::EmptyInput(_) => ErrorClass::Client,
            EfakturError::ReferenceUnavailable(_) => ErrorClass::Upstream,
            _ => ErrorClass::Internal,
        }
    }

    /// Message safe to hand back to a caller.
    ///
    /// Internal failures collapse to a generic message.
    pub fn public_message(&self) -> String {
        match self.class() {
            ErrorClass::Client => self.to_string(),
            ErrorClass::Upstream => "Reference service unavailable".to_string(),
            ErrorClass::Internal => "Internal Server Error".to_string(),
        }
    }
}

/// Result type for the efaktur library.
pub type Result<T> = std::result::Result<T, EfakturError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_errors_are_client_errors() {
        assert_eq!(
            EfakturError::UnsupportedFormat("gif".to_string()).class(),
            ErrorClass::Client
        );
        assert_eq!(EfakturError::NotFound(PathBuf::from("x.pdf")).class(), ErrorClass::Client);
        assert_eq!(EfakturError::EmptyInput(PathBuf::from("x.pdf")).class(), ErrorClass::Client);
    }

    #[test]
    fn test_reference_errors_are_upstream() {
        let err = EfakturError::from(ReferenceError::Status(503));
        assert_eq!(err.class(), ErrorClass::Upstream);
        assert_eq!(err.class().status_code(), 502);
    }

    #[test]
    fn test_internal_message_does_not_leak() {
        let err = EfakturError::Pdf(PdfError::Parse("xref table at offset 1234 broken".to_string()));
        assert_eq!(err.class(), ErrorClass::Internal);
        assert_eq!(err.public_message(), "Internal Server Error");
    }
}
