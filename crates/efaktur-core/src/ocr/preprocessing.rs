//! Image preprocessing for OCR.

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::models::config::PreprocessingConfig;

/// Deterministic grayscale/contrast/normalize pass applied before OCR.
pub struct ImagePreprocessor {
    /// Contrast adjustment in percent.
    contrast: f32,
    /// Stretch luminance to the full range.
    normalize: bool,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            contrast: config.contrast,
            normalize: config.normalize,
        }
    }

    /// Grayscale, boost contrast, and normalize.
    ///
    /// The input is left untouched; the processed copy is returned.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let mut gray = image.to_luma8();

        if self.contrast != 0.0 {
            gray = image::imageops::contrast(&gray, self.contrast);
        }

        if self.normalize {
            gray = stretch_histogram(&gray);
        }

        debug!(
            "Preprocessed {}x{} image (contrast {}, normalize {})",
            gray.width(),
            gray.height(),
            self.contrast,
            self.normalize
        );

        DynamicImage::ImageLuma8(gray)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Linearly map the observed luminance range onto 0..=255.
fn stretch_histogram(image: &GrayImage) -> GrayImage {
    let (min, max) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if max <= min {
        return image.clone();
    }

    let range = (max - min) as u32;
    let mut result = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = ((pixel[0] - min) as u32 * 255 + range / 2) / range;
        result.put_pixel(x, y, Luma([value as u8]));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_stretch_histogram() {
        let mut image = GrayImage::new(2, 1);
        image.put_pixel(0, 0, Luma([100]));
        image.put_pixel(1, 0, Luma([150]));

        let stretched = stretch_histogram(&image);
        assert_eq!(stretched.get_pixel(0, 0)[0], 0);
        assert_eq!(stretched.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_uniform_image_is_unchanged() {
        let image = GrayImage::from_pixel(3, 3, Luma([42]));
        let stretched = stretch_histogram(&image);
        assert_eq!(stretched, image);
    }

    #[test]
    fn test_prepare_outputs_grayscale() {
        let rgb = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        let prepared = ImagePreprocessor::new().prepare(&DynamicImage::ImageRgb8(rgb));

        assert!(matches!(prepared, DynamicImage::ImageLuma8(_)));
        assert_eq!((prepared.width(), prepared.height()), (4, 4));
    }

    #[test]
    fn test_prepare_is_deterministic() {
        let mut rgb = RgbImage::new(8, 8);
        for (x, y, pixel) in rgb.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 30) as u8, (y * 20) as u8, 128]);
        }
        let image = DynamicImage::ImageRgb8(rgb);
        let preprocessor = ImagePreprocessor::new();

        assert_eq!(preprocessor.prepare(&image), preprocessor.prepare(&image));
    }
}
