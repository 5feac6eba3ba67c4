//! Seller/buyer ordering by source type.
//!
//! Embedded PDF text and OCR output present the seller and buyer blocks in
//! opposite reading order. Party-scoped rules pick their match index from
//! this table instead of inferring it from the text.

use serde::{Deserialize, Serialize};

/// Where the raw text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Embedded text layer of a PDF.
    Pdf,
    /// OCR output of a raster image.
    Image,
}

/// A party block on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Seller,
    Buyer,
}

/// Match indices for each party within a sequence of label matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyPolarity {
    pub seller: usize,
    pub buyer: usize,
}

impl PartyPolarity {
    /// Index of the match belonging to `role`.
    pub fn index(&self, role: PartyRole) -> usize {
        match role {
            PartyRole::Seller => self.seller,
            PartyRole::Buyer => self.buyer,
        }
    }
}

/// Polarity per source type.
pub const POLARITY_TABLE: [(SourceType, PartyPolarity); 2] = [
    (SourceType::Image, PartyPolarity { seller: 0, buyer: 1 }),
    (SourceType::Pdf, PartyPolarity { seller: 1, buyer: 0 }),
];

/// Extensions accepted for each source type.
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

impl SourceType {
    /// Look up the party polarity for this source type.
    pub fn polarity(self) -> PartyPolarity {
        POLARITY_TABLE
            .iter()
            .find(|(source, _)| *source == self)
            .map(|(_, polarity)| *polarity)
            .unwrap_or(PartyPolarity { seller: 0, buyer: 1 })
    }

    /// Map a file extension (with or without the leading dot) to a source type.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = normalize_extension(extension);
        if PDF_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceType::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceType::Image)
        } else {
            None
        }
    }

    /// Extensions accepted for this source type.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceType::Pdf => PDF_EXTENSIONS,
            SourceType::Image => IMAGE_EXTENSIONS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Image => "image",
        }
    }
}

/// Lowercase an extension and drop a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
