use std::cell::Cell;

use efaktur_core::error::{OcrError, PdfError, ReferenceError};
use efaktur_core::invoice::rules::RuleContext;
use efaktur_core::models::validation::ValidationStatus;
use efaktur_core::pdf::{self, PdfProcessor};
use efaktur_core::reference::parse_reference_document;
use efaktur_core::{
    ArtifactStore, DeviationKind, ErrorClass, Field, OcrEngine, ReferenceDocument,
    ReferenceResolver, ValidationPipeline, ValidationRequest,
};
use image::{DynamicImage, Rgb, RgbImage};
use pretty_assertions::assert_eq;

const FAKTUR_TEXT: &str = "Faktur Pajak
Kode dan Nomor Seri Faktur Pajak : 010.001-23.00000012
Pengusaha Kena Pajak
Nama : PT Sumber Makmur Abadi
NPWP : 01.234.567.8-901.000
Pembeli Barang Kena Pajak / Penerima Jasa Kena Pajak
Nama : CV Berkah Sejahtera
NPWP : 02.345.678.9-012.000
Dasar Pengenaan Pajak 1.000,00
Total PPN Dasar Pengenaan Pajak 120,00
JAKARTA, 15 Januari 2024
";

const DJP_RESPONSE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<resValidateFakturPm>
  <nomorFaktur>0012300000012</nomorFaktur>
  <tanggalFaktur>15/01/2024</tanggalFaktur>
  <npwpPenjual>012345678901000</npwpPenjual>
  <namaPenjual>PT Sumber Makmur Abadi</namaPenjual>
  <npwpLawanTransaksi>023456789012000</npwpLawanTransaksi>
  <namaLawanTransaksi>CV Berkah Sejahtera</namaLawanTransaksi>
  <jumlahDpp>1000</jumlahDpp>
  <jumlahPpn>120</jumlahPpn>
  <statusApproval>Faktur Valid, Sudah Diapprove oleh DJP</statusApproval>
  <statusFaktur>Faktur Pajak Normal</statusFaktur>
</resValidateFakturPm>";

/// Returns `FAKTUR_TEXT` for any image.
#[derive(Default)]
struct ScriptedOcr {
    calls: Cell<usize>,
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.set(self.calls.get() + 1);
        Ok(FAKTUR_TEXT.to_string())
    }
}

/// A PDF whose text layer is `FAKTUR_TEXT` with the party blocks swapped,
/// as the PDF layout lists the buyer first.
#[derive(Default)]
struct SwappedPdf;

impl PdfProcessor for SwappedPdf {
    fn load(&mut self, _data: &[u8]) -> pdf::Result<()> {
        Ok(())
    }

    fn page_count(&self) -> u32 {
        1
    }

    fn extract_text(&self) -> pdf::Result<String> {
        Ok("Kode dan Nomor Seri Faktur Pajak : 010.001-23.00000012\n\
            Nama : CV Berkah Sejahtera\n\
            NPWP : 02.345.678.9-012.000\n\
            Nama : PT Sumber Makmur Abadi\n\
            NPWP : 01.234.567.8-901.000\n\
            Dasar Pengenaan Pajak 1.000,00\n\
            PPN Dasar Pengenaan Pajak 120,00\n\
            Bandung, 15 Januari 2024\n"
            .to_string())
    }
}

#[derive(Default)]
struct BrokenPdf;

impl PdfProcessor for BrokenPdf {
    fn load(&mut self, _data: &[u8]) -> pdf::Result<()> {
        Err(PdfError::Parse("trailer at byte 1234 is corrupt".to_string()))
    }

    fn page_count(&self) -> u32 {
        0
    }

    fn extract_text(&self) -> pdf::Result<String> {
        Err(PdfError::Parse("No document loaded".to_string()))
    }
}

/// Serves a fixed provider body.
struct FixedResolver {
    body: &'static str,
}

impl ReferenceResolver for FixedResolver {
    async fn resolve(&self, _url: &str) -> Result<ReferenceDocument, ReferenceError> {
        parse_reference_document(self.body, &RuleContext::default())
    }
}

struct UnreachableResolver;

impl ReferenceResolver for UnreachableResolver {
    async fn resolve(&self, _url: &str) -> Result<ReferenceDocument, ReferenceError> {
        Err(ReferenceError::Status(503))
    }
}

const LOOKUP_URL: &str = "http://svc.efaktur.pajak.go.id/validasi/faktur/123";

fn store_png(store: &ArtifactStore) -> efaktur_core::StoredArtifact {
    let mut bytes = std::io::Cursor::new(Vec::new());
    RgbImage::from_pixel(32, 32, Rgb([250, 250, 250]))
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    store.store(bytes.get_ref(), "png").unwrap()
}

#[tokio::test]
async fn test_image_upload_validates_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store_png(&store);

    let pipeline: ValidationPipeline<_, _> = ValidationPipeline::new(
        ScriptedOcr::default(),
        FixedResolver { body: DJP_RESPONSE },
    );
    let report = pipeline
        .run(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await
        .unwrap();

    assert_eq!(report.result.deviations, vec![]);
    assert_eq!(report.status(), ValidationStatus::ValidatedSuccessfully);
    assert_eq!(report.result.validated_data, report.reference.record);
    assert!(artifact.path.exists());
}

#[tokio::test]
async fn test_pdf_upload_uses_reversed_polarity() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store.store(b"%PDF-1.4 stub", "pdf").unwrap();

    let pipeline: ValidationPipeline<_, _, SwappedPdf> = ValidationPipeline::new(
        ScriptedOcr::default(),
        FixedResolver { body: DJP_RESPONSE },
    );
    let response = pipeline
        .validate(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await;

    assert_eq!(response.status, ValidationStatus::ValidatedSuccessfully);
    assert_eq!(response.message, "Validation complete");
    let status = response.reference_status.unwrap();
    assert_eq!(status.invoice_status.as_deref(), Some("Faktur Pajak Normal"));
}

#[tokio::test]
async fn test_missing_vat_is_reported() {
    let body = DJP_RESPONSE.replace("<jumlahPpn>120</jumlahPpn>", "<jumlahPpn>132</jumlahPpn>");
    let body: &'static str = Box::leak(body.into_boxed_str());

    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store_png(&store);

    let pipeline: ValidationPipeline<_, _> =
        ValidationPipeline::new(ScriptedOcr::default(), FixedResolver { body });
    let response = pipeline
        .validate(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await;

    assert_eq!(response.status, ValidationStatus::ValidatedWithDeviations);
    let deviations = response.validation_results.unwrap().deviations;
    assert_eq!(deviations.len(), 1);
    assert_eq!(deviations[0].field, Field::VatAmount);
    assert_eq!(deviations[0].deviation_kind, DeviationKind::Mismatch);
}

#[tokio::test]
async fn test_empty_upload_never_reaches_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store.store(b"", "jpg").unwrap();

    let pipeline: ValidationPipeline<_, _> = ValidationPipeline::new(
        ScriptedOcr::default(),
        FixedResolver { body: DJP_RESPONSE },
    );
    let response = pipeline
        .validate(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await;

    assert!(response.is_error());
    assert_eq!(response.error_class, Some(ErrorClass::Client));
    assert!(response.message.starts_with("file is empty"));
}

#[tokio::test]
async fn test_unreachable_reference_is_upstream_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store_png(&store);

    let pipeline: ValidationPipeline<_, _> =
        ValidationPipeline::new(ScriptedOcr::default(), UnreachableResolver);
    let response = pipeline
        .validate(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await;

    assert_eq!(response.error_class, Some(ErrorClass::Upstream));
    assert_eq!(response.message, "Reference service unavailable");
    assert!(response.validation_results.is_none());
}

#[tokio::test]
async fn test_internal_failure_does_not_leak_details() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let artifact = store.store(b"%PDF-1.4 broken", "pdf").unwrap();

    let pipeline: ValidationPipeline<_, _, BrokenPdf> = ValidationPipeline::new(
        ScriptedOcr::default(),
        FixedResolver { body: DJP_RESPONSE },
    );
    let response = pipeline
        .validate(&ValidationRequest::for_artifact(&artifact, LOOKUP_URL))
        .await;

    assert_eq!(response.error_class, Some(ErrorClass::Internal));
    assert_eq!(response.message, "Internal Server Error");
}
