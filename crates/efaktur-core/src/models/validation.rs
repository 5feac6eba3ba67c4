//! Validation outcome models.

use serde::Serialize;

use super::record::{CanonicalInvoiceRecord, Field, FieldValue};
use crate::error::ErrorClass;

/// How an extracted field disagrees with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationKind {
    /// Reference has a value, the extracted record does not.
    MissingInExtracted,
    /// Extracted record has a value, the reference does not.
    MissingInReference,
    /// Both present and different.
    Mismatch,
}

impl DeviationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationKind::MissingInExtracted => "missing_in_extracted",
            DeviationKind::MissingInReference => "missing_in_reference",
            DeviationKind::Mismatch => "mismatch",
        }
    }
}

/// A single field-level discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationRecord {
    pub field: Field,
    pub extracted_value: Option<FieldValue>,
    pub reference_value: Option<FieldValue>,
    pub deviation_kind: DeviationKind,
}

/// Comparator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Deviations in reference field order.
    pub deviations: Vec<DeviationRecord>,
    /// The reference record, verbatim.
    pub validated_data: CanonicalInvoiceRecord,
}

/// Status reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    ValidatedSuccessfully,
    ValidatedWithDeviations,
    Error,
}

impl ValidationStatus {
    /// Status for a completed comparison.
    pub fn from_deviations(deviations: &[DeviationRecord]) -> Self {
        if deviations.is_empty() {
            ValidationStatus::ValidatedSuccessfully
        } else {
            ValidationStatus::ValidatedWithDeviations
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::ValidatedSuccessfully => "validated_successfully",
            ValidationStatus::ValidatedWithDeviations => "validated_with_deviations",
            ValidationStatus::Error => "error",
        }
    }
}

/// Provider-side status strings carried next to the reference record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_status: Option<String>,
}

/// Final response of a validation call.
///
/// Keys are camelCase throughout, matching the nested result and record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub status: ValidationStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_results: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_status: Option<ReferenceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_class: Option<ErrorClass>,
}

impl ValidationResponse {
    /// Response for a completed comparison.
    pub fn completed(result: ValidationResult, reference_status: ReferenceStatus) -> Self {
        Self {
            status: ValidationStatus::from_deviations(&result.deviations),
            message: "Validation complete".to_string(),
            validation_results: Some(result),
            reference_status: Some(reference_status),
            error_class: None,
        }
    }

    /// Response for a failed validation.
    pub fn failed(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Error,
            message: message.into(),
            validation_results: None,
            reference_status: None,
            error_class: Some(class),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }
}
