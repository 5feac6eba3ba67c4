//! Core library for Indonesian e-Faktur validation.
//!
//! This crate provides:
//! - Source adapters for PDF text layers and raster images (OCR)
//! - Rule-table field extraction into a canonical eight-field record
//! - Resolution of the authoritative record from the tax authority
//! - Field-by-field comparison and the validation pipeline

pub mod compare;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod reference;
pub mod source;
pub mod storage;

pub use compare::compare_records;
pub use error::{EfakturError, ErrorClass, Result};
pub use invoice::{EfakturParser, ExtractionResult, FieldOutcome, InvoiceParser, SourceType};
pub use models::{
    CanonicalInvoiceRecord, DeviationKind, DeviationRecord, EfakturConfig, Field, FieldValue,
    ValidationResponse, ValidationResult, ValidationStatus,
};
pub use ocr::{ImagePreprocessor, OcrEngine};
#[cfg(feature = "native")]
pub use ocr::{LazyOcrEngine, PureOcrEngine};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{PipelineStage, ValidationPipeline, ValidationReport, ValidationRequest};
pub use reference::{HttpReferenceResolver, ReferenceDocument, ReferenceResolver};
pub use source::{ImageSourceAdapter, PdfSourceAdapter, SourceAdapter};
pub use storage::{ArtifactStore, StoredArtifact};
