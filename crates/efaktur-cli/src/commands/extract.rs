//! Extract command - read the canonical fields from a single e-Faktur.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use efaktur_core::invoice::polarity::normalize_extension;
use efaktur_core::{
    CanonicalInvoiceRecord, EfakturParser, ExtractionResult, Field, ImagePreprocessor,
    ImageSourceAdapter, LazyOcrEngine, PdfExtractor, PdfSourceAdapter, SourceAdapter, SourceType,
};

use super::{emit, load_config, spinner, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF, JPG or PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let extension = args
        .input
        .extension()
        .map(|e| normalize_extension(&e.to_string_lossy()))
        .unwrap_or_default();
    let Some(source) = SourceType::from_extension(&extension) else {
        anyhow::bail!("Unsupported file format: {}", extension);
    };

    info!("Extracting {} as {}", args.input.display(), source.as_str());

    let parser = EfakturParser::new()
        .with_invoice_number_digits(config.extraction.invoice_number_digits);

    let pb = spinner("Extracting fields...")?;
    let result = match source {
        SourceType::Pdf => PdfSourceAdapter::<PdfExtractor>::from_config(&config.pdf)
            .extract(&args.input, &extension, &parser),
        SourceType::Image => ImageSourceAdapter::new(LazyOcrEngine::new(config.ocr.clone()))
            .with_preprocessor(ImagePreprocessor::from_config(&config.preprocessing))
            .extract(&args.input, &extension, &parser),
    };
    pb.finish_and_clear();
    let result = result?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    emit(&format_extraction(&result, args.format)?, args.output.as_deref())?;
    Ok(())
}

/// JSON output is the bare record, so it can be fed back to `compare`.
pub fn format_extraction(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.record)?),
        OutputFormat::Csv => format_csv(&result.record),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(record: &CanonicalInvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.as_str()))?;
    wtr.write_record(record.fields().map(|(_, value)| value.to_string()))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Source: {}\n\n", result.source_type.as_str()));
    for (field, value) in result.record.fields() {
        let found = result.outcome(field).is_some_and(|o| o.is_found());
        let marker = if found { "" } else { "  (not found)" };
        output.push_str(&format!("  {:<14} {}{}\n", field.as_str(), value, marker));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use efaktur_core::InvoiceParser;

    #[test]
    fn test_csv_has_header_and_row() {
        let result = EfakturParser::new().parse(
            "NPWP : 01.234.567.8-901.000\nNama : PT Maju Jaya",
            SourceType::Image,
        );
        let csv = format_extraction(&result, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "npwpPenjual,namaPenjual,npwpPembeli,namaPembeli,nomorFaktur,tanggalFaktur,jumlahDpp,jumlahPpn"
        );
        assert!(lines[1].starts_with("12345678901000,PT Maju Jaya,0,,0,,0,0"));
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let result = EfakturParser::new().parse("Nama : PT Maju Jaya", SourceType::Image);
        let text = format_extraction(&result, OutputFormat::Text).unwrap();

        assert!(text.contains("namaPenjual    PT Maju Jaya\n"));
        assert!(text.contains("npwpPenjual    0  (not found)"));
    }

    #[test]
    fn test_json_is_bare_record() {
        let result = EfakturParser::new().parse("", SourceType::Pdf);
        let json = format_extraction(&result, OutputFormat::Json).unwrap();
        let record: CanonicalInvoiceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, result.record);
    }
}
