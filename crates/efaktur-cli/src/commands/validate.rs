//! Validate command - check an e-Faktur against its reference record.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use efaktur_core::models::validation::DeviationRecord;
use efaktur_core::{
    ArtifactStore, HttpReferenceResolver, LazyOcrEngine, OcrEngine, ReferenceResolver,
    ValidationPipeline, ValidationRequest, ValidationResponse, ValidationStatus,
};

use super::{emit, load_config, spinner, OutputFormat};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input file (PDF, JPG or PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Lookup URL of the reference record (the e-Faktur QR code target)
    #[arg(short, long)]
    lookup_url: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Directory uploaded artifacts are stored in
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let upload_dir = args
        .upload_dir
        .clone()
        .unwrap_or_else(|| config.storage.upload_dir.clone());
    let store = ArtifactStore::new(upload_dir);

    info!("Validating {}", args.input.display());

    // Everything fallible is set up before the upload is copied into the store
    let resolver = HttpReferenceResolver::new(&config.reference)?
        .with_invoice_number_digits(config.extraction.invoice_number_digits);
    let pipeline: ValidationPipeline<_, _> = ValidationPipeline::from_config(
        &config,
        LazyOcrEngine::new(config.ocr.clone()),
        resolver,
    );
    let pb = spinner("Validating e-Faktur...")?;

    let response = validate_upload(
        &pipeline,
        &store,
        &args.input,
        &args.lookup_url,
        config.storage.retain_artifacts,
    )
    .await;
    pb.finish_and_clear();

    emit(&format_response(&response, args.format)?, args.output.as_deref())?;
    debug!("Total processing time: {:?}", start.elapsed());

    match response.status {
        ValidationStatus::ValidatedSuccessfully => {
            eprintln!("{} Validated successfully", style("✓").green());
        }
        ValidationStatus::ValidatedWithDeviations => {
            let count = response
                .validation_results
                .as_ref()
                .map(|r| r.deviations.len())
                .unwrap_or(0);
            eprintln!("{} Validated with {} deviation(s)", style("!").yellow(), count);
        }
        ValidationStatus::Error => {
            anyhow::bail!("Validation failed: {}", response.message);
        }
    }

    Ok(())
}

/// Ingest `input`, validate it, and discard the stored copy unless `retain`.
async fn validate_upload<O, R>(
    pipeline: &ValidationPipeline<O, R>,
    store: &ArtifactStore,
    input: &Path,
    lookup_url: &str,
    retain: bool,
) -> ValidationResponse
where
    O: OcrEngine,
    R: ReferenceResolver,
{
    let artifact = match store.ingest(input) {
        Ok(artifact) => artifact,
        Err(e) => return ValidationResponse::failed(e.class(), e.public_message()),
    };

    let request = ValidationRequest::for_artifact(&artifact, lookup_url.to_string());
    let response = pipeline.validate(&request).await;

    if !retain {
        if let Err(e) = store.discard(&artifact) {
            warn!("Failed to remove {}: {}", artifact.path.display(), e);
        }
    }
    response
}

pub fn format_response(response: &ValidationResponse, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Csv => format_csv(response),
        OutputFormat::Text => Ok(format_text(response)),
    }
}

fn deviations(response: &ValidationResponse) -> &[DeviationRecord] {
    response
        .validation_results
        .as_ref()
        .map(|r| r.deviations.as_slice())
        .unwrap_or(&[])
}

fn format_csv(response: &ValidationResponse) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "deviation_kind", "extracted_value", "reference_value"])?;

    for deviation in deviations(response) {
        wtr.write_record([
            deviation.field.as_str().to_string(),
            deviation.deviation_kind.as_str().to_string(),
            display_value(&deviation.extracted_value),
            display_value(&deviation.reference_value),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(response: &ValidationResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("Status: {}\n", response.status.as_str()));
    output.push_str(&format!("Message: {}\n", response.message));

    if let Some(status) = &response.reference_status {
        if let Some(approval) = &status.approval_status {
            output.push_str(&format!("Approval: {}\n", approval));
        }
        if let Some(invoice) = &status.invoice_status {
            output.push_str(&format!("Invoice status: {}\n", invoice));
        }
    }

    let deviations = deviations(response);
    if !deviations.is_empty() {
        output.push_str("\nDeviations:\n");
        for deviation in deviations {
            output.push_str(&format!(
                "  {:<14} {}\n    extracted: {}\n    reference: {}\n",
                deviation.field.as_str(),
                deviation.deviation_kind.as_str(),
                display_value(&deviation.extracted_value),
                display_value(&deviation.reference_value),
            ));
        }
    }

    if let Some(results) = &response.validation_results {
        output.push_str("\nReference record:\n");
        for (field, value) in results.validated_data.fields() {
            output.push_str(&format!("  {:<14} {}\n", field.as_str(), value));
        }
    }

    output
}

fn display_value(value: &Option<efaktur_core::FieldValue>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}
