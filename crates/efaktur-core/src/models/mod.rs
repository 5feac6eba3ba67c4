//! Data models for records, validation outcomes, and configuration.

pub mod config;
pub mod record;
pub mod validation;

pub use config::EfakturConfig;
pub use record::{CanonicalInvoiceRecord, Field, FieldValue};
pub use validation::{
    DeviationKind, DeviationRecord, ReferenceStatus, ValidationResponse, ValidationResult,
    ValidationStatus,
};
