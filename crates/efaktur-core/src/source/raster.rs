use std::path::Path;

use image::ImageReader;
use tracing::debug;

use crate::error::Result;
use crate::invoice::SourceType;
use crate::ocr::{ImagePreprocessor, OcrEngine};

use super::SourceAdapter;

/// Recognizes text in a raster e-Faktur (photo or scan).
pub struct ImageSourceAdapter<O> {
    engine: O,
    preprocessor: ImagePreprocessor,
}

impl<O: OcrEngine> ImageSourceAdapter<O> {
    pub fn new(engine: O) -> Self {
        Self {
            engine,
            preprocessor: ImagePreprocessor::new(),
        }
    }

    /// Replace the preprocessing step.
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn engine(&self) -> &O {
        &self.engine
    }
}

impl<O: OcrEngine> SourceAdapter for ImageSourceAdapter<O> {
    fn source_type(&self) -> SourceType {
        SourceType::Image
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        // Stored uploads may carry no suffix, so the decoder comes from the content
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        let prepared = self.preprocessor.prepare(&image);
        Ok(self.engine.recognize(&prepared)?)
    }
}
