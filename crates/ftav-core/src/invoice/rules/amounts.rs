//! VAT and total amount extraction for UAE invoices.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::{TOTAL_AMOUNT, TOTAL_AMOUNT_LOOSE, VAT_AMOUNT, VAT_AMOUNT_LOOSE};
use super::{FieldExtractor, first_match, followed_by_percent};

/// Longest integer part accepted as an amount; longer runs are identifiers.
const MAX_INTEGER_DIGITS: usize = 12;

/// Which declared amount to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    /// `VAT [Amount] [AED] 50.00`
    Vat,
    /// `Total [Amount] [AED] 1,050.00`
    Total,
}

impl AmountKind {
    fn strict(&self) -> &'static Regex {
        match self {
            AmountKind::Vat => &*VAT_AMOUNT,
            AmountKind::Total => &*TOTAL_AMOUNT,
        }
    }

    fn loose(&self) -> &'static Regex {
        match self {
            AmountKind::Vat => &*VAT_AMOUNT_LOOSE,
            AmountKind::Total => &*TOTAL_AMOUNT_LOOSE,
        }
    }

    /// First words after the label that show the number belongs elsewhere
    /// (`VAT Reg No`, `Total VAT`).
    fn foreign_words(&self) -> &'static [&'static str] {
        match self {
            AmountKind::Vat => &["reg", "trn", "no", "number", "id"],
            AmountKind::Total => &["vat", "tax"],
        }
    }
}

/// Amount field extractor.
pub struct AmountExtractor {
    kind: AmountKind,
}

impl AmountExtractor {
    pub fn new(kind: AmountKind) -> Self {
        Self { kind }
    }

    /// Label immediately followed by the amount.
    fn strict(&self, text: &str) -> Option<Decimal> {
        self.kind.strict().captures_iter(text).find_map(|caps| {
            let amount = caps.get(1)?;
            if followed_by_percent(text, amount.end()) {
                return None;
            }
            parse_amount(amount.as_str())
        })
    }

    /// Label, a short gap, then a currency marker or colon before the amount.
    fn loose(&self, text: &str) -> Option<Decimal> {
        self.kind.loose().captures_iter(text).find_map(|caps| {
            let gap = caps.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
            let first_word = gap
                .split(|c: char| !c.is_alphabetic())
                .find(|word| !word.is_empty())
                .unwrap_or("");
            if self
                .kind
                .foreign_words()
                .iter()
                .any(|word| first_word.starts_with(*word))
            {
                return None;
            }
            let amount = caps.get(2)?;
            if followed_by_percent(text, amount.end()) {
                return None;
            }
            parse_amount(amount.as_str())
        })
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match::<Decimal>(
            text,
            &[&|t: &str| self.strict(t), &|t: &str| self.loose(t)],
        )
    }
}

/// Parse an amount literal such as `1,050.00` or `50`.
///
/// Thousands separators are stripped. Negative values and integer parts too
/// long to be a plausible amount are rejected.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    let integer_digits = cleaned.split('.').next().unwrap_or("").len();
    if integer_digits == 0 || integer_digits > MAX_INTEGER_DIGITS {
        return None;
    }

    Decimal::from_str(&cleaned)
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}
