//! End-to-end validation of one uploaded e-Faktur.
//!
//! A request moves through [`PipelineStage`]s in a fixed order. The first
//! failing stage ends the request; nothing partial is returned.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info};

use crate::compare::compare_records;
use crate::error::{EfakturError, Result};
use crate::invoice::polarity::normalize_extension;
use crate::invoice::{EfakturParser, ExtractionResult, InvoiceParser, SourceType};
use crate::models::config::EfakturConfig;
use crate::models::validation::{ValidationResponse, ValidationResult, ValidationStatus};
use crate::ocr::{ImagePreprocessor, OcrEngine};
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::reference::{ReferenceDocument, ReferenceResolver};
use crate::source::{validate_artifact, ImageSourceAdapter, PdfSourceAdapter, SourceAdapter};
use crate::storage::StoredArtifact;

/// Input to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub artifact_path: PathBuf,
    /// Extension of the original upload, with or without the dot.
    pub declared_extension: String,
    /// Lookup URL of the authoritative record.
    pub lookup_url: String,
}

impl ValidationRequest {
    pub fn new(
        artifact_path: impl Into<PathBuf>,
        declared_extension: impl Into<String>,
        lookup_url: impl Into<String>,
    ) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            declared_extension: declared_extension.into(),
            lookup_url: lookup_url.into(),
        }
    }

    /// Request for an artifact already placed in an [`ArtifactStore`](crate::storage::ArtifactStore).
    pub fn for_artifact(artifact: &StoredArtifact, lookup_url: impl Into<String>) -> Self {
        Self::new(artifact.path.clone(), artifact.extension.clone(), lookup_url)
    }
}

/// Stages of a validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Adapted,
    Extracted,
    ReferenceFetched,
    Compared,
    Responded,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Adapted => "adapted",
            PipelineStage::Extracted => "extracted",
            PipelineStage::ReferenceFetched => "reference_fetched",
            PipelineStage::Compared => "compared",
            PipelineStage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub extraction: ExtractionResult,
    pub reference: ReferenceDocument,
    pub result: ValidationResult,
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_deviations(&self.result.deviations)
    }

    pub fn into_response(self) -> ValidationResponse {
        let status = self.reference.status();
        ValidationResponse::completed(self.result, status)
    }
}

/// Sequential adapter → extractor → resolver → comparator pipeline.
pub struct ValidationPipeline<O, R, P = PdfExtractor> {
    parser: EfakturParser,
    pdf: PdfSourceAdapter<P>,
    image: ImageSourceAdapter<O>,
    resolver: R,
}

impl<O, R, P> ValidationPipeline<O, R, P>
where
    O: OcrEngine,
    R: ReferenceResolver,
    P: PdfProcessor + Default,
{
    /// Pipeline with default extraction settings.
    pub fn new(engine: O, resolver: R) -> Self {
        Self {
            parser: EfakturParser::new(),
            pdf: PdfSourceAdapter::new(),
            image: ImageSourceAdapter::new(engine),
            resolver,
        }
    }

    /// Pipeline using the PDF, preprocessing, and extraction sections of `config`.
    pub fn from_config(config: &EfakturConfig, engine: O, resolver: R) -> Self {
        Self {
            parser: EfakturParser::new()
                .with_invoice_number_digits(config.extraction.invoice_number_digits),
            pdf: PdfSourceAdapter::from_config(&config.pdf),
            image: ImageSourceAdapter::new(engine)
                .with_preprocessor(ImagePreprocessor::from_config(&config.preprocessing)),
            resolver,
        }
    }

    fn adapter(&self, source: SourceType) -> &dyn SourceAdapter {
        match source {
            SourceType::Pdf => &self.pdf,
            SourceType::Image => &self.image,
        }
    }

    /// Adapt and extract only, without contacting the reference provider.
    pub fn extract(&self, path: &Path, declared_extension: &str) -> Result<ExtractionResult> {
        let source = SourceType::from_extension(declared_extension).ok_or_else(|| {
            EfakturError::UnsupportedFormat(normalize_extension(declared_extension))
        })?;
        let adapter = self.adapter(source);

        validate_artifact(path, declared_extension, source)?;
        let text = adapter.read_text(path)?;
        info!(
            "Stage {}: {} characters of {} text",
            PipelineStage::Adapted,
            text.len(),
            source.as_str()
        );

        let extraction = self.parser.parse(&text, source);
        info!(
            "Stage {}: {} of {} fields found",
            PipelineStage::Extracted,
            extraction.outcomes.len() - extraction.missing_fields().len(),
            extraction.outcomes.len()
        );
        Ok(extraction)
    }

    /// Run every stage, propagating the first failure.
    pub async fn run(&self, request: &ValidationRequest) -> Result<ValidationReport> {
        info!(
            "Stage {}: {} ({})",
            PipelineStage::Received,
            request.artifact_path.display(),
            request.declared_extension
        );

        let extraction = self.extract(&request.artifact_path, &request.declared_extension)?;

        let reference = self.resolver.resolve(&request.lookup_url).await?;
        info!("Stage {}: {}", PipelineStage::ReferenceFetched, request.lookup_url);

        let result = compare_records(&extraction.record, &reference.record);
        info!(
            "Stage {}: {} deviation(s)",
            PipelineStage::Compared,
            result.deviations.len()
        );

        Ok(ValidationReport {
            extraction,
            reference,
            result,
        })
    }

    /// Run the pipeline and turn any failure into an error response.
    pub async fn validate(&self, request: &ValidationRequest) -> ValidationResponse {
        let start = Instant::now();
        let response = match self.run(request).await {
            Ok(report) => report.into_response(),
            Err(e) => {
                error!("Validation of {} failed: {}", request.artifact_path.display(), e);
                ValidationResponse::failed(e.class(), e.public_message())
            }
        };

        info!(
            "Stage {}: {} in {:?}",
            PipelineStage::Responded,
            response.status.as_str(),
            start.elapsed()
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, OcrError, ReferenceError};
    use crate::models::record::CanonicalInvoiceRecord;
    use image::DynamicImage;
    use rust_decimal::Decimal;

    struct NoOcr;

    impl OcrEngine for NoOcr {
        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            Err(OcrError::Unavailable("test".to_string()))
        }
    }

    struct DownResolver;

    impl ReferenceResolver for DownResolver {
        async fn resolve(
            &self,
            _url: &str,
        ) -> std::result::Result<ReferenceDocument, ReferenceError> {
            Err(ReferenceError::Status(503))
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::ReferenceFetched.to_string(), "reference_fetched");
        assert_eq!(PipelineStage::Responded.to_string(), "responded");
    }

    #[test]
    fn test_report_response_carries_reference_status() {
        let reference = ReferenceDocument {
            record: CanonicalInvoiceRecord {
                vat_amount: Decimal::from(120),
                ..Default::default()
            },
            approval_status: Some("Faktur Valid".to_string()),
            invoice_status: None,
        };
        let result = compare_records(&reference.record, &reference.record);
        let report = ValidationReport {
            extraction: EfakturParser::new().parse("", SourceType::Pdf),
            reference,
            result,
        };

        let response = report.into_response();
        assert_eq!(response.message, "Validation complete");
        assert_eq!(
            response.reference_status.unwrap().approval_status.as_deref(),
            Some("Faktur Valid")
        );
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_client_error() {
        let pipeline: ValidationPipeline<_, _> = ValidationPipeline::new(NoOcr, DownResolver);
        let request = ValidationRequest::new("/tmp/faktur.gif", ".gif", "http://example.invalid");

        let response = pipeline.validate(&request).await;

        assert!(response.is_error());
        assert_eq!(response.error_class, Some(ErrorClass::Client));
        assert_eq!(response.message, "unsupported file type: gif");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let pipeline: ValidationPipeline<_, _> = ValidationPipeline::new(NoOcr, DownResolver);
        let request = ValidationRequest::new("/nonexistent/faktur.pdf", "pdf", "http://example.invalid");

        let err = pipeline.run(&request).await.unwrap_err();
        assert!(matches!(err, EfakturError::NotFound(_)));
    }
}
