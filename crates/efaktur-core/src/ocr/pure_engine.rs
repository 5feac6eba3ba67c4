//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrEngine, TextBox, assemble_text};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        info!("Recognizing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut boxes: Vec<TextBox> = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                },
                confidence: r.confidence,
            })
            .collect();

        let text = assemble_text(&mut boxes);

        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Loads the models on first use, so runs that never see an image never
/// need model files.
///
/// The loaded engine is shared between threads; recognition calls are
/// serialized because the underlying engine caches compiled models
/// internally.
pub struct LazyOcrEngine {
    config: OcrConfig,
    engine: OnceLock<Mutex<PureOcrEngine>>,
}

impl LazyOcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            engine: OnceLock::new(),
        }
    }

    /// Whether the models have been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self) -> Result<&Mutex<PureOcrEngine>, OcrError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }
        let engine = PureOcrEngine::from_config(&self.config)?;
        Ok(self.engine.get_or_init(|| Mutex::new(engine)))
    }
}

impl OcrEngine for LazyOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let engine = self
            .engine()?
            .lock()
            .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;
        engine.recognize(image)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
