//! Authoritative invoice records from the tax authority's validation service.

mod http;

pub use http::HttpReferenceResolver;

use std::future::Future;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReferenceError;
use crate::invoice::rules::{
    clean_party_name, last_digits, normalize_date, normalize_tax_id, parse_amount,
    AmountNotation, RuleContext,
};
use crate::models::record::CanonicalInvoiceRecord;
use crate::models::validation::ReferenceStatus;

/// Root element of a validation response.
pub const DOCUMENT_ROOT: &str = "resValidateFakturPm";

/// A resolved reference record plus the provider's status strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceDocument {
    pub record: CanonicalInvoiceRecord,
    pub approval_status: Option<String>,
    pub invoice_status: Option<String>,
}

impl ReferenceDocument {
    pub fn status(&self) -> ReferenceStatus {
        ReferenceStatus {
            approval_status: self.approval_status.clone(),
            invoice_status: self.invoice_status.clone(),
        }
    }
}

/// Trait for fetching the authoritative record behind a lookup URL.
pub trait ReferenceResolver {
    fn resolve(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<ReferenceDocument, ReferenceError>> + Send;
}

/// Fields of `resValidateFakturPm` as the provider names them.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ValidationPayload {
    npwp_penjual: String,
    nama_penjual: String,
    npwp_lawan_transaksi: String,
    nama_lawan_transaksi: String,
    nomor_faktur: String,
    tanggal_faktur: String,
    jumlah_dpp: String,
    jumlah_ppn: String,
    status_approval: Option<String>,
    status_faktur: Option<String>,
}

/// Parse a validation response body into a reference document.
///
/// Provider values go through the same normalizers as extracted text, so
/// the two records are directly comparable.
pub fn parse_reference_document(
    body: &str,
    context: &RuleContext,
) -> Result<ReferenceDocument, ReferenceError> {
    let root = root_element(body)?;
    if root != DOCUMENT_ROOT {
        return Err(ReferenceError::UnexpectedDocument(root));
    }

    let payload: ValidationPayload =
        quick_xml::de::from_str(body).map_err(|e| ReferenceError::Parse(e.to_string()))?;
    debug!("Reference payload: {:?}", payload);

    let record = CanonicalInvoiceRecord {
        seller_tax_id: normalize_tax_id(&payload.npwp_penjual),
        seller_name: clean_party_name(&payload.nama_penjual),
        buyer_tax_id: normalize_tax_id(&payload.npwp_lawan_transaksi),
        buyer_name: clean_party_name(&payload.nama_lawan_transaksi),
        invoice_number: last_digits(&payload.nomor_faktur, context.invoice_number_digits),
        invoice_date: normalize_date(&payload.tanggal_faktur),
        tax_base_amount: parse_amount(&payload.jumlah_dpp, AmountNotation::Machine),
        vat_amount: parse_amount(&payload.jumlah_ppn, AmountNotation::Machine),
    };

    Ok(ReferenceDocument {
        record,
        approval_status: non_blank(payload.status_approval),
        invoice_status: non_blank(payload.status_faktur),
    })
}

/// Name of the first element in the document.
fn root_element(body: &str) -> Result<String, ReferenceError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(ReferenceError::Parse("document has no root element".to_string()));
            }
            Ok(_) => {}
            Err(e) => return Err(ReferenceError::Parse(e.to_string())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<resValidateFakturPm>
    <kdJenisTransaksi>01</kdJenisTransaksi>
    <fgPengganti>0</fgPengganti>
    <nomorFaktur>0012300000012</nomorFaktur>
    <tanggalFaktur>15/01/2024</tanggalFaktur>
    <npwpPenjual>012345678901000</npwpPenjual>
    <namaPenjual>PT   SUMBER MAKMUR ABADI</namaPenjual>
    <alamatPenjual>JL. SUDIRMAN NO. 1, JAKARTA</alamatPenjual>
    <npwpLawanTransaksi>023456789012000</npwpLawanTransaksi>
    <namaLawanTransaksi>CV BERKAH SEJAHTERA</namaLawanTransaksi>
    <jumlahDpp>10000000</jumlahDpp>
    <jumlahPpn>1100000</jumlahPpn>
    <jumlahPpnBm>0</jumlahPpnBm>
    <statusApproval>Faktur Valid, Sudah Diapprove oleh DJP</statusApproval>
    <statusFaktur>Faktur Pajak Normal</statusFaktur>
    <detailTransaksi>
        <nama>Jasa konsultasi</nama>
        <hargaTotal>10000000</hargaTotal>
    </detailTransaksi>
</resValidateFakturPm>"#;

    #[test]
    fn test_parse_reference_document() {
        let document = parse_reference_document(RESPONSE, &RuleContext::default()).unwrap();

        let expected = CanonicalInvoiceRecord {
            seller_tax_id: 12345678901000,
            seller_name: "PT SUMBER MAKMUR ABADI".to_string(),
            buyer_tax_id: 23456789012000,
            buyer_name: "CV BERKAH SEJAHTERA".to_string(),
            invoice_number: 12300000012,
            invoice_date: "15/01/2024".to_string(),
            tax_base_amount: Decimal::from(10_000_000),
            vat_amount: Decimal::from(1_100_000),
        };

        assert_eq!(document.record, expected);
        assert_eq!(
            document.approval_status.as_deref(),
            Some("Faktur Valid, Sudah Diapprove oleh DJP")
        );
        assert_eq!(document.invoice_status.as_deref(), Some("Faktur Pajak Normal"));
    }

    #[test]
    fn test_missing_fields_become_sentinels() {
        let body = "<resValidateFakturPm><nomorFaktur>0012300000012</nomorFaktur></resValidateFakturPm>";
        let document = parse_reference_document(body, &RuleContext::default()).unwrap();

        assert_eq!(document.record.invoice_number, 12300000012);
        assert_eq!(document.record.seller_tax_id, 0);
        assert_eq!(document.record.vat_amount, Decimal::ZERO);
        assert_eq!(document.status(), ReferenceStatus::default());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let body = "<error><message>Faktur tidak ditemukan</message></error>";
        let err = parse_reference_document(body, &RuleContext::default()).unwrap_err();
        assert!(matches!(err, ReferenceError::UnexpectedDocument(root) if root == "error"));
    }

    #[test]
    fn test_non_xml_is_a_parse_error() {
        let err = parse_reference_document("", &RuleContext::default()).unwrap_err();
        assert!(matches!(err, ReferenceError::Parse(_)));
    }
}
