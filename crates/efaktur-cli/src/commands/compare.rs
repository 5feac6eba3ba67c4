//! Compare command - offline comparison of saved records.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use efaktur_core::invoice::rules::RuleContext;
use efaktur_core::reference::parse_reference_document;
use efaktur_core::{compare_records, CanonicalInvoiceRecord, ValidationResponse};

use super::validate::format_response;
use super::{emit, load_config, OutputFormat};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Extracted record as written by `efaktur extract`
    #[arg(required = true)]
    extracted: PathBuf,

    /// Reference response body (resValidateFakturPm XML)
    #[arg(required = true)]
    reference: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let extracted: CanonicalInvoiceRecord =
        serde_json::from_str(&fs::read_to_string(&args.extracted)?)?;

    let context = RuleContext {
        invoice_number_digits: config.extraction.invoice_number_digits,
    };
    let reference = parse_reference_document(&fs::read_to_string(&args.reference)?, &context)?;

    info!(
        "Comparing {} against {}",
        args.extracted.display(),
        args.reference.display()
    );

    let result = compare_records(&extracted, &reference.record);
    let deviation_count = result.deviations.len();
    let response = ValidationResponse::completed(result, reference.status());

    emit(&format_response(&response, args.format)?, args.output.as_deref())?;

    if deviation_count == 0 {
        eprintln!("{} Records match", style("✓").green());
    } else {
        eprintln!("{} {} deviation(s)", style("!").yellow(), deviation_count);
    }

    Ok(())
}
