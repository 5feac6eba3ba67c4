//! Field-by-field comparison of an extracted record against the reference.

use tracing::debug;

use crate::models::record::{CanonicalInvoiceRecord, FieldValue};
use crate::models::validation::{DeviationKind, DeviationRecord, ValidationResult};

/// Compare `extracted` against `reference`, walking the reference's fields.
///
/// Emptiness is judged with [`FieldValue::is_empty`]. An empty extracted
/// value is always `MissingInExtracted`, even when the reference is empty
/// too. Never fails.
pub fn compare_records(
    extracted: &CanonicalInvoiceRecord,
    reference: &CanonicalInvoiceRecord,
) -> ValidationResult {
    let mut deviations = Vec::new();

    for (field, reference_value) in reference.fields() {
        let extracted_value = extracted.get(field);

        let deviation = if extracted_value.is_empty() {
            Some(DeviationRecord {
                field,
                extracted_value: None,
                reference_value: present(reference_value),
                deviation_kind: DeviationKind::MissingInExtracted,
            })
        } else if reference_value.is_empty() {
            Some(DeviationRecord {
                field,
                extracted_value: Some(extracted_value),
                reference_value: None,
                deviation_kind: DeviationKind::MissingInReference,
            })
        } else if extracted_value != reference_value {
            Some(DeviationRecord {
                field,
                extracted_value: Some(extracted_value),
                reference_value: Some(reference_value),
                deviation_kind: DeviationKind::Mismatch,
            })
        } else {
            None
        };

        if let Some(deviation) = deviation {
            debug!("{}: {:?}", field, deviation.deviation_kind);
            deviations.push(deviation);
        }
    }

    ValidationResult {
        deviations,
        validated_data: reference.clone(),
    }
}

fn present(value: FieldValue) -> Option<FieldValue> {
    (!value.is_empty()).then_some(value)
}
