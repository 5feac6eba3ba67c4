//! Source adapters turning uploaded artifacts into raw invoice text.
//!
//! Artifacts are checked with [`validate_artifact`] before any PDF or OCR
//! work starts.

mod raster;
mod pdf;

pub use raster::ImageSourceAdapter;
pub use pdf::PdfSourceAdapter;

use std::path::Path;

use tracing::{debug, info};

use crate::error::{EfakturError, Result};
use crate::invoice::{EfakturParser, ExtractionResult, InvoiceParser, SourceType};
use crate::invoice::polarity::normalize_extension;

/// Trait for artifact-to-record adapters.
pub trait SourceAdapter {
    /// Source type handed to the field extractor.
    fn source_type(&self) -> SourceType;

    /// Produce raw text from an artifact that already passed validation.
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Validate, read and parse an artifact.
    fn extract(
        &self,
        path: &Path,
        declared_extension: &str,
        parser: &EfakturParser,
    ) -> Result<ExtractionResult> {
        validate_artifact(path, declared_extension, self.source_type())?;

        info!(
            "Adapting {} as {} source",
            path.display(),
            self.source_type().as_str()
        );
        let text = self.read_text(path)?;
        debug!("Adapter produced {} characters", text.len());

        Ok(parser.parse(&text, self.source_type()))
    }
}

/// Check that an artifact exists, is non-empty, and has an accepted extension.
pub fn validate_artifact(path: &Path, declared_extension: &str, source: SourceType) -> Result<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EfakturError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.len() == 0 {
        return Err(EfakturError::EmptyInput(path.to_path_buf()));
    }

    let extension = normalize_extension(declared_extension);
    if !source.extensions().contains(&extension.as_str()) {
        return Err(EfakturError::UnsupportedFormat(extension));
    }

    Ok(())
}
