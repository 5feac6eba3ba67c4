//! e-Faktur field extraction module.

mod parser;
pub mod polarity;
pub mod rules;

pub use parser::{EfakturParser, ExtractionResult, FieldOutcome, InvoiceParser};
pub use polarity::{PartyPolarity, PartyRole, SourceType};
