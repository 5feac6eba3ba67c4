//! Rule-based field extractors for e-Faktur documents.
//!
//! Extraction is driven by [`FIELD_RULES`], an ordered table of
//! label/pattern/selector/postprocessor entries. Adding a label variant is a
//! table change, not a parser change.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod tax_id;
pub mod text;

pub use amounts::{normalize_currency, parse_amount, AmountNotation};
pub use dates::{format_date, format_long_date, month_name_to_number, normalize_date, resolve_month, MonthLocale};
pub use tax_id::{last_digits, normalize_tax_id};
pub use text::{clean_party_name, normalize_whitespace, strip_numeric_suffix};

use lazy_static::lazy_static;
use regex::Regex;

use self::patterns::{DPP_AMOUNT, INVOICE_SERIAL, NAME, NPWP, SIGNATURE_DATE};
use super::polarity::{PartyRole, SourceType};
use crate::models::record::{Field, FieldValue};

/// Settings a postprocessor may depend on.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    /// Trailing digits kept from the invoice serial code.
    pub invoice_number_digits: usize,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self {
            invoice_number_digits: 12,
        }
    }
}

/// Which match of a pattern a rule takes.
#[derive(Debug, Clone, Copy)]
pub enum Selector {
    /// First match anywhere in the text.
    First,
    /// Match index chosen by the source-type polarity table.
    Party(PartyRole),
    /// Line by line; a line qualifies when the marker's presence equals
    /// `marker_present`. The last qualifying line wins.
    Lines {
        marker: &'static str,
        marker_present: bool,
    },
}

/// One declarative extraction rule.
pub struct FieldRule {
    pub field: Field,
    pub label: &'static str,
    pub pattern: &'static Regex,
    pub selector: Selector,
    pub postprocess: fn(&str, &RuleContext) -> FieldValue,
}

impl FieldRule {
    /// Find the raw capture for this rule, if any.
    pub fn select(&self, text: &str, source: SourceType) -> Option<String> {
        match self.selector {
            Selector::First => self
                .pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            Selector::Party(role) => {
                let index = source.polarity().index(role);
                self.pattern
                    .captures_iter(text)
                    .nth(index)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            }
            Selector::Lines {
                marker,
                marker_present,
            } => {
                let marker = marker.to_lowercase();
                text.lines()
                    .filter(|line| line.to_lowercase().contains(&marker) == marker_present)
                    .filter_map(|line| {
                        self.pattern
                            .captures(line)
                            .and_then(|caps| caps.get(1))
                            .map(|m| m.as_str().trim().to_string())
                    })
                    .last()
            }
        }
    }

    /// Apply the rule: `None` when the pattern did not match.
    pub fn apply(&self, text: &str, source: SourceType, ctx: &RuleContext) -> Option<FieldValue> {
        self.select(text, source)
            .map(|raw| (self.postprocess)(&raw, ctx))
    }
}

fn to_invoice_number(raw: &str, ctx: &RuleContext) -> FieldValue {
    FieldValue::Integer(last_digits(raw, ctx.invoice_number_digits))
}

fn to_tax_id(raw: &str, _ctx: &RuleContext) -> FieldValue {
    FieldValue::Integer(normalize_tax_id(raw))
}

fn to_party_name(raw: &str, _ctx: &RuleContext) -> FieldValue {
    FieldValue::Text(clean_party_name(raw))
}

fn to_invoice_date(raw: &str, _ctx: &RuleContext) -> FieldValue {
    FieldValue::Text(format_long_date(raw.trim()))
}

fn to_amount(raw: &str, _ctx: &RuleContext) -> FieldValue {
    FieldValue::Amount(normalize_currency(raw))
}

const VAT_MARKER: &str = "PPN";

lazy_static! {
    /// The extraction rule table, in canonical field order.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule {
            field: Field::SellerTaxId,
            label: "NPWP",
            pattern: &NPWP,
            selector: Selector::Party(PartyRole::Seller),
            postprocess: to_tax_id,
        },
        FieldRule {
            field: Field::SellerName,
            label: "Nama",
            pattern: &NAME,
            selector: Selector::Party(PartyRole::Seller),
            postprocess: to_party_name,
        },
        FieldRule {
            field: Field::BuyerTaxId,
            label: "NPWP",
            pattern: &NPWP,
            selector: Selector::Party(PartyRole::Buyer),
            postprocess: to_tax_id,
        },
        FieldRule {
            field: Field::BuyerName,
            label: "Nama",
            pattern: &NAME,
            selector: Selector::Party(PartyRole::Buyer),
            postprocess: to_party_name,
        },
        FieldRule {
            field: Field::InvoiceNumber,
            label: "Kode dan Nomor Seri Faktur Pajak",
            pattern: &INVOICE_SERIAL,
            selector: Selector::First,
            postprocess: to_invoice_number,
        },
        FieldRule {
            field: Field::InvoiceDate,
            label: ", <day> <month> <year>",
            pattern: &SIGNATURE_DATE,
            selector: Selector::First,
            postprocess: to_invoice_date,
        },
        FieldRule {
            field: Field::TaxBaseAmount,
            label: "Dasar Pengenaan Pajak",
            pattern: &DPP_AMOUNT,
            selector: Selector::Lines { marker: VAT_MARKER, marker_present: false },
            postprocess: to_amount,
        },
        FieldRule {
            field: Field::VatAmount,
            label: "Dasar Pengenaan Pajak",
            pattern: &DPP_AMOUNT,
            selector: Selector::Lines { marker: VAT_MARKER, marker_present: true },
            postprocess: to_amount,
        },
    ];
}
