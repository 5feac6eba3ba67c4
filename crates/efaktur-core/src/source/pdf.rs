use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::invoice::SourceType;
use crate::models::config::PdfConfig;
use crate::pdf::{PdfExtractor, PdfProcessor, PdfType};

use super::SourceAdapter;

/// Reads the embedded text layer of a PDF e-Faktur.
pub struct PdfSourceAdapter<P = PdfExtractor> {
    min_text_length: usize,
    _processor: PhantomData<fn() -> P>,
}

impl<P: PdfProcessor + Default> PdfSourceAdapter<P> {
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            _processor: PhantomData,
        }
    }
}

impl<P: PdfProcessor + Default> Default for PdfSourceAdapter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PdfProcessor + Default> SourceAdapter for PdfSourceAdapter<P> {
    fn source_type(&self) -> SourceType {
        SourceType::Pdf
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let data = std::fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());

        let mut processor = P::default();
        processor.load(&data)?;
        let content = processor.content(self.min_text_length)?;
        debug!("PDF {} has {} page(s)", path.display(), content.page_count);

        if content.pdf_type == PdfType::Empty {
            // Scanned PDFs carry no text layer; fields degrade to sentinels.
            warn!(
                "PDF {} has little or no embedded text ({} chars over {} page(s))",
                path.display(),
                content.text.trim().len(),
                content.page_count
            );
        }

        Ok(content.text)
    }
}
