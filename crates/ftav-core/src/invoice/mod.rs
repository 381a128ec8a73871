//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::InvoiceFieldExtractor;

use crate::models::fields::FieldSet;

/// Trait for invoice field extractors.
///
/// Implementations are total: any text, including an empty one, yields a
/// field set, with missing fields left as `None`.
pub trait InvoiceExtractor: Send + Sync {
    /// Extract invoice fields from plain text.
    fn extract(&self, text: &str) -> FieldSet;
}
