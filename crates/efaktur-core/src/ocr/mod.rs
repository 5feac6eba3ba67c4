//! OCR over raster invoice images.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::{LazyOcrEngine, PureOcrEngine};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Trait for text recognition backends.
pub trait OcrEngine {
    /// Recognize all text in an already preprocessed image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// A recognized text region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Vertical band height used to group boxes into rows.
const ROW_HEIGHT: f32 = 20.0;

/// Sort boxes top-to-bottom, left-to-right and join rows into text.
///
/// Boxes sharing a row are joined with a space so labels such as
/// `NPWP :` stay on the same line as their value.
pub fn assemble_text(boxes: &mut [TextBox]) -> String {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();
        let row_a = (ay / ROW_HEIGHT) as i32;
        let row_b = (by / ROW_HEIGHT) as i32;
        row_a
            .cmp(&row_b)
            .then(ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current_row = None;
    for text_box in boxes.iter() {
        let (_, y, _, _) = text_box.rect();
        let row = (y / ROW_HEIGHT) as i32;
        match lines.last_mut() {
            Some(line) if current_row == Some(row) => {
                line.push(' ');
                line.push_str(&text_box.text);
            }
            _ => lines.push(text_box.text.clone()),
        }
        current_row = Some(row);
    }

    lines.join("\n")
}
