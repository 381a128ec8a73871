//! Rule-based field extractors for UAE tax invoices.
//!
//! Every field is found by an ordered list of independent matchers, strictest
//! first; [`first_match`] returns the first one that yields a value.

pub mod amounts;
pub mod dates;
pub mod markers;
pub mod number;
pub mod parties;
pub mod patterns;
pub mod trn;
pub mod vat;

pub use amounts::{AmountExtractor, AmountKind, parse_amount};
pub use dates::DateExtractor;
pub use markers::{Markers, detect_markers};
pub use number::InvoiceNumberExtractor;
pub use parties::{PartyExtractor, PartyRole};
pub use trn::{TrnExtractor, is_valid_trn};
pub use vat::VatRateExtractor;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text. Absence is `None`, never an error.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A single matching strategy for one field.
pub type Matcher<'a, T> = &'a dyn Fn(&str) -> Option<T>;

/// Run matchers in order and return the first value found.
pub fn first_match<T>(text: &str, matchers: &[Matcher<'_, T>]) -> Option<T> {
    matchers.iter().find_map(|matcher| matcher(text))
}

/// Whether the first non-blank character at `end` is a percent sign.
pub(crate) fn followed_by_percent(text: &str, end: usize) -> bool {
    text[end..].trim_start().starts_with('%')
}
