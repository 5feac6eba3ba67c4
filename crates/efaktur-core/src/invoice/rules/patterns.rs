//! Common regex patterns for e-Faktur extraction.
//!
//! All label patterns are case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Serial code: "Kode dan Nomor Seri Faktur Pajak : 010.001-23.00000012"
    pub static ref INVOICE_SERIAL: Regex = Regex::new(
        r"(?i)Kode dan Nomor Seri Faktur Pajak\s*:\s*([0-9.\-]+)"
    ).unwrap();

    // NPWP (Indonesian tax ID): "NPWP : 01.234.567.8-901.000"
    pub static ref NPWP: Regex = Regex::new(
        r"(?i)NPWP\s*:\s*([0-9.\-]+)"
    ).unwrap();

    // Party name: rest of the line after "Nama :"
    pub static ref NAME: Regex = Regex::new(
        r"(?i)Nama\s*:\s*(.+)"
    ).unwrap();

    pub static ref NAME_LABEL: Regex = Regex::new(
        r"(?i)^Nama\s*:\s*"
    ).unwrap();

    // OCR bleed from an adjacent column, e.g. "PT Maju Jaya 12"
    pub static ref TRAILING_DIGITS: Regex = Regex::new(
        r"\d+\s*$"
    ).unwrap();

    // Signature line date: "Jakarta, 15 Januari 2024"
    pub static ref SIGNATURE_DATE: Regex = Regex::new(
        r"(?i),\s*(\d{1,2}\s+[A-Za-z]+\s+\d{4})"
    ).unwrap();

    // Already-canonical numeric date: 15/01/2024, 5-1-2024, 15.01.2024
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})$"
    ).unwrap();

    // Amount following the DPP label on the same line
    pub static ref DPP_AMOUNT: Regex = Regex::new(
        r"(?i)Dasar Pengenaan Pajak\s*([0-9.,]+)"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
