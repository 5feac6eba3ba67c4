//! Rule-table driven e-Faktur parser.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::models::record::{CanonicalInvoiceRecord, Field, FieldValue};

use super::polarity::SourceType;
use super::rules::{RuleContext, FIELD_RULES};

/// Outcome of one field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// The pattern matched; the value may still be empty after cleanup.
    Found(FieldValue),
    /// The pattern did not match.
    NotFound,
}

impl FieldOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, FieldOutcome::Found(_))
    }
}

/// Result of invoice extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Flattened record; missing fields carry their sentinel.
    pub record: CanonicalInvoiceRecord,
    /// Per-field outcome in canonical field order.
    pub outcomes: Vec<(Field, FieldOutcome)>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Source the text came from.
    pub source_type: SourceType,
}

impl ExtractionResult {
    /// Fields whose pattern did not match.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_found())
            .map(|(field, _)| *field)
            .collect()
    }

    /// Outcome for a single field.
    pub fn outcome(&self, field: Field) -> Option<&FieldOutcome> {
        self.outcomes
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, outcome)| outcome)
    }
}

/// Trait for invoice parsing.
///
/// Parsing never fails: absent fields degrade to their sentinel values.
pub trait InvoiceParser {
    /// Parse an e-Faktur from raw text.
    fn parse(&self, text: &str, source: SourceType) -> ExtractionResult;
}

/// Parser applying [`FIELD_RULES`] in order.
#[derive(Debug, Clone, Default)]
pub struct EfakturParser {
    context: RuleContext,
}

impl EfakturParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many trailing serial-code digits form the invoice number.
    pub fn with_invoice_number_digits(mut self, digits: usize) -> Self {
        self.context.invoice_number_digits = digits;
        self
    }
}

impl InvoiceParser for EfakturParser {
    fn parse(&self, text: &str, source: SourceType) -> ExtractionResult {
        let start = Instant::now();
        info!(
            "Parsing e-Faktur from {} characters of {} text",
            text.len(),
            source.as_str()
        );
        trace!("Raw text:\n{}", text);

        let mut record = CanonicalInvoiceRecord::new();
        let mut outcomes = Vec::with_capacity(FIELD_RULES.len());
        let mut warnings = Vec::new();

        for rule in FIELD_RULES.iter() {
            let outcome = match rule.apply(text, source, &self.context) {
                Some(value) => {
                    debug!("{} ({}): {}", rule.field, rule.label, value);
                    record.set(rule.field, value.clone());
                    FieldOutcome::Found(value)
                }
                None => {
                    warnings.push(format!("Could not extract {}", rule.field));
                    FieldOutcome::NotFound
                }
            };
            outcomes.push((rule.field, outcome));
        }

        if !warnings.is_empty() {
            warn!(
                "Partial extraction: {} of {} fields missing",
                warnings.len(),
                FIELD_RULES.len()
            );
        }

        debug!("Extraction finished in {:?}", start.elapsed());

        ExtractionResult {
            record,
            outcomes,
            warnings,
            source_type: source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const IMAGE_TEXT: &str = r#"
Faktur Pajak
Kode dan Nomor Seri Faktur Pajak : 010.001-23.00000012
Pengusaha Kena Pajak
Nama : PT Sumber Makmur Abadi
Alamat : Jl. Sudirman No. 1, Jakarta
NPWP : 01.234.567.8-901.000
Pembeli Barang Kena Pajak / Penerima Jasa Kena Pajak
Nama : CV Berkah   Sejahtera 3
Alamat : Jl. Asia Afrika No. 8, Bandung
NPWP : 02.345.678.9-012.000
Dasar Pengenaan Pajak 10.000.000,00
Total PPN Dasar Pengenaan Pajak 1.100.000,00
JAKARTA, 15 Januari 2024
"#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_image_text() {
        let result = EfakturParser::new().parse(IMAGE_TEXT, SourceType::Image);

        let expected = CanonicalInvoiceRecord {
            seller_tax_id: 12345678901000,
            seller_name: "PT Sumber Makmur Abadi".to_string(),
            buyer_tax_id: 23456789012000,
            buyer_name: "CV Berkah Sejahtera".to_string(),
            invoice_number: 12300000012,
            invoice_date: "15/01/2024".to_string(),
            tax_base_amount: dec("10000000"),
            vat_amount: dec("1100000"),
        };

        assert_eq!(result.record, expected);
        assert!(result.warnings.is_empty());
        assert!(result.missing_fields().is_empty());
    }

    #[test]
    fn test_pdf_source_reverses_parties() {
        let image = EfakturParser::new().parse(IMAGE_TEXT, SourceType::Image).record;
        let pdf = EfakturParser::new().parse(IMAGE_TEXT, SourceType::Pdf).record;

        assert_eq!(pdf.seller_tax_id, image.buyer_tax_id);
        assert_eq!(pdf.buyer_tax_id, image.seller_tax_id);
        assert_eq!(pdf.seller_name, image.buyer_name);
        assert_eq!(pdf.buyer_name, image.seller_name);
        assert_eq!(pdf.invoice_number, image.invoice_number);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = EfakturParser::new();
        let first = parser.parse(IMAGE_TEXT, SourceType::Pdf);
        let second = parser.parse(IMAGE_TEXT, SourceType::Pdf);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text_degrades_to_sentinels() {
        let result = EfakturParser::new().parse("", SourceType::Image);

        assert_eq!(result.record, CanonicalInvoiceRecord::new());
        assert_eq!(result.missing_fields().len(), 8);
        assert_eq!(result.warnings.len(), 8);
    }

    #[test]
    fn test_found_empty_is_distinct_from_not_found() {
        let text = "Nama : 12345\n";
        let result = EfakturParser::new().parse(text, SourceType::Image);

        assert_eq!(
            result.outcome(Field::SellerName),
            Some(&FieldOutcome::Found(FieldValue::Text(String::new())))
        );
        assert_eq!(result.outcome(Field::BuyerName), Some(&FieldOutcome::NotFound));
        assert_eq!(result.record.seller_name, "");
    }

    #[test]
    fn test_unknown_month_yields_empty_date() {
        let text = "Bandung, 3 Brumaire 2024";
        let result = EfakturParser::new().parse(text, SourceType::Pdf);

        assert_eq!(result.record.invoice_date, "");
        assert!(result.outcome(Field::InvoiceDate).unwrap().is_found());
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let text = "kode dan nomor seri faktur pajak: 070.002-24.12345678\nnpwp: 0012345\n";
        let result = EfakturParser::new().parse(text, SourceType::Image);

        assert_eq!(result.record.invoice_number, 22412345678);
        assert_eq!(result.record.seller_tax_id, 12345);
    }

    #[test]
    fn test_custom_invoice_digits() {
        let text = "Kode dan Nomor Seri Faktur Pajak : 010.001-23.00000012";
        let result = EfakturParser::new()
            .with_invoice_number_digits(8)
            .parse(text, SourceType::Pdf);
        assert_eq!(result.record.invoice_number, 12);
    }
}
