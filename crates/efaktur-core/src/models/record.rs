//! Canonical e-Faktur record shared by the extraction and reference paths.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The eight-field record both construction paths converge on.
///
/// Every field is always present. "Not found" is represented by the field's
/// empty value: `0` for integers and amounts, `""` for text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalInvoiceRecord {
    /// Seller tax ID (NPWP), digits only, one leading zero group removed.
    #[serde(rename = "npwpPenjual")]
    pub seller_tax_id: u64,

    /// Seller name, whitespace-collapsed.
    #[serde(rename = "namaPenjual")]
    pub seller_name: String,

    /// Buyer tax ID (NPWP).
    #[serde(rename = "npwpPembeli")]
    pub buyer_tax_id: u64,

    /// Buyer name, whitespace-collapsed.
    #[serde(rename = "namaPembeli")]
    pub buyer_name: String,

    /// Trailing digits of the invoice serial code.
    #[serde(rename = "nomorFaktur")]
    pub invoice_number: u64,

    /// Invoice date as `DD/MM/YYYY`, or empty.
    #[serde(rename = "tanggalFaktur")]
    pub invoice_date: String,

    /// Tax base amount (DPP).
    #[serde(rename = "jumlahDpp")]
    pub tax_base_amount: Decimal,

    /// VAT amount (PPN).
    #[serde(rename = "jumlahPpn")]
    pub vat_amount: Decimal,
}

/// Names of the record fields, in reference iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "npwpPenjual")]
    SellerTaxId,
    #[serde(rename = "namaPenjual")]
    SellerName,
    #[serde(rename = "npwpPembeli")]
    BuyerTaxId,
    #[serde(rename = "namaPembeli")]
    BuyerName,
    #[serde(rename = "nomorFaktur")]
    InvoiceNumber,
    #[serde(rename = "tanggalFaktur")]
    InvoiceDate,
    #[serde(rename = "jumlahDpp")]
    TaxBaseAmount,
    #[serde(rename = "jumlahPpn")]
    VatAmount,
}

impl Field {
    /// All fields in reference iteration order.
    pub const ALL: [Field; 8] = [
        Field::SellerTaxId,
        Field::SellerName,
        Field::BuyerTaxId,
        Field::BuyerName,
        Field::InvoiceNumber,
        Field::InvoiceDate,
        Field::TaxBaseAmount,
        Field::VatAmount,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::SellerTaxId => "npwpPenjual",
            Field::SellerName => "namaPenjual",
            Field::BuyerTaxId => "npwpPembeli",
            Field::BuyerName => "namaPembeli",
            Field::InvoiceNumber => "nomorFaktur",
            Field::InvoiceDate => "tanggalFaktur",
            Field::TaxBaseAmount => "jumlahDpp",
            Field::VatAmount => "jumlahPpn",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u64),
    Amount(Decimal),
    Text(String),
}

impl FieldValue {
    /// Whether the value is the field's "not found" sentinel.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Integer(n) => *n == 0,
            FieldValue::Amount(a) => a.is_zero(),
            FieldValue::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Amount(a) => write!(f, "{}", a),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl CanonicalInvoiceRecord {
    /// Create an empty record (every field at its sentinel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one field.
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::SellerTaxId => FieldValue::Integer(self.seller_tax_id),
            Field::SellerName => FieldValue::Text(self.seller_name.clone()),
            Field::BuyerTaxId => FieldValue::Integer(self.buyer_tax_id),
            Field::BuyerName => FieldValue::Text(self.buyer_name.clone()),
            Field::InvoiceNumber => FieldValue::Integer(self.invoice_number),
            Field::InvoiceDate => FieldValue::Text(self.invoice_date.clone()),
            Field::TaxBaseAmount => FieldValue::Amount(self.tax_base_amount),
            Field::VatAmount => FieldValue::Amount(self.vat_amount),
        }
    }

    /// Write one field. Values of the wrong kind are ignored.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::SellerTaxId, FieldValue::Integer(n)) => self.seller_tax_id = n,
            (Field::BuyerTaxId, FieldValue::Integer(n)) => self.buyer_tax_id = n,
            (Field::InvoiceNumber, FieldValue::Integer(n)) => self.invoice_number = n,
            (Field::SellerName, FieldValue::Text(s)) => self.seller_name = s,
            (Field::BuyerName, FieldValue::Text(s)) => self.buyer_name = s,
            (Field::InvoiceDate, FieldValue::Text(s)) => self.invoice_date = s,
            (Field::TaxBaseAmount, FieldValue::Amount(a)) => self.tax_base_amount = a,
            (Field::VatAmount, FieldValue::Amount(a)) => self.vat_amount = a,
            _ => {}
        }
    }

    /// All fields with their values, in reference iteration order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, FieldValue)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
