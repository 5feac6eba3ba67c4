//! Configuration structures for the validation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::EfakturError;
use crate::invoice::rules::tax_id::MAX_U64_DIGITS;

/// Main configuration for the efaktur pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EfakturConfig {
    /// Artifact storage configuration.
    pub storage: StorageConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessingConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Reference service configuration.
    pub reference: ReferenceConfig,
}

/// Where uploaded artifacts land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving uploaded artifacts.
    pub upload_dir: PathBuf,

    /// Keep artifacts after validation instead of deleting them.
    pub retain_artifacts: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("storages"),
            retain_artifacts: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF as carrying a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

/// Image preprocessing applied before OCR.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Contrast adjustment in percent (positive increases contrast).
    pub contrast: f32,

    /// Stretch the luminance histogram to the full range.
    pub normalize: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            contrast: 50.0,
            normalize: true,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of trailing serial-code digits kept as the invoice number.
    pub invoice_number_digits: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            invoice_number_digits: 12,
        }
    }
}

/// Reference service client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent to the provider.
    pub user_agent: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("efaktur/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EfakturConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        config.validate().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        Ok(config)
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        let digits = self.extraction.invoice_number_digits;
        if digits == 0 || digits > MAX_U64_DIGITS {
            return Err(EfakturError::Config(format!(
                "extraction.invoice_number_digits must be between 1 and {}, got {}",
                MAX_U64_DIGITS, digits
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
