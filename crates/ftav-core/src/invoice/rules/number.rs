//! Invoice number extraction.

use super::patterns::{INVOICE_NUMBER_BARE, INVOICE_NUMBER_LABELED, NUMBER_SHORT};
use super::{FieldExtractor, first_match};

/// Words that, right before `No.` / `#`, mean the number is not the invoice's.
const FOREIGN_NUMBER_LABELS: &[&str] = &[
    "registration",
    "trn",
    "vat",
    "tel",
    "phone",
    "po",
    "p.o.",
    "order",
    "account",
];

/// Invoice number extractor.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }

    /// `Invoice No: INV-001`, `Invoice #42`, `Invoice Number - 2024/7`
    fn labeled(text: &str) -> Option<String> {
        INVOICE_NUMBER_LABELED
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .find(|token| !token.is_empty())
    }

    /// `Invoice INV-001`. The token must contain a digit, otherwise this
    /// would pick up the next word after any "Tax Invoice" heading.
    fn bare(text: &str) -> Option<String> {
        INVOICE_NUMBER_BARE
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .find(|token| token.chars().any(|c| c.is_ascii_digit()))
    }

    /// `No. 123` or `# 123` on its own.
    fn short(text: &str) -> Option<String> {
        NUMBER_SHORT.captures_iter(text).find_map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let preceding = text[..start]
                .split_whitespace()
                .next_back()
                .unwrap_or("")
                .to_lowercase();
            let preceding = preceding.trim_end_matches([':', '-']);
            if FOREIGN_NUMBER_LABELS.contains(&preceding) {
                return None;
            }
            Some(caps[1].to_string()).filter(|token| !token.is_empty())
        })
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match::<String>(text, &[&Self::labeled, &Self::bare, &Self::short])
    }
}
