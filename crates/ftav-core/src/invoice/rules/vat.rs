//! VAT rate extraction for UAE invoices.

use std::ops::Range;

use rust_decimal::Decimal;

use crate::models::config::ExtractionConfig;
use crate::models::fields::VatRate;

use super::patterns::{
    RATE_BARE, RATE_PERCENT, TOTAL_AMOUNT, TOTAL_AMOUNT_LOOSE, VAT_AMOUNT, VAT_AMOUNT_LOOSE,
    VAT_RATE_LABELED,
};
use super::{FieldExtractor, first_match};

/// VAT rate extractor.
///
/// Labeled rates are kept whatever their value so a wrong rate can be
/// reported; unlabeled tokens are only taken when they read as the standard
/// or the zero rate.
pub struct VatRateExtractor {
    standard_rate: Decimal,
}

impl VatRateExtractor {
    pub fn new(standard_rate: Decimal) -> Self {
        Self { standard_rate }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.standard_vat_rate)
    }

    /// Canonical spelling of a rate token: `5%`, `5`, `0%`, `0`, or the
    /// token itself without inner whitespace.
    pub fn normalize(&self, token: &str) -> String {
        let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
        let percent = if compact.ends_with('%') { "%" } else { "" };

        match VatRate::classify(&compact, self.standard_rate) {
            VatRate::Standard => format!("{}{}", self.standard_rate.normalize(), percent),
            VatRate::Zero => format!("0{percent}"),
            VatRate::Other => compact,
        }
    }

    fn is_accepted(&self, token: &str) -> bool {
        VatRate::classify(token, self.standard_rate) != VatRate::Other
    }

    /// `VAT 5%`, `VAT Rate: 0 %`, `VAT @ 10%`
    fn labeled(&self, text: &str) -> Option<String> {
        VAT_RATE_LABELED
            .captures(text)
            .map(|caps| self.normalize(&caps[1]))
    }

    /// Any `5%` / `0 %` token.
    fn percent(&self, text: &str) -> Option<String> {
        RATE_PERCENT
            .captures_iter(text)
            .find(|caps| self.is_accepted(&caps[1]))
            .map(|caps| self.normalize(&caps[0]))
    }

    /// A bare `5` / `0` word, not part of a decimal, date, reference or
    /// amount.
    fn bare(&self, text: &str) -> Option<String> {
        let amounts = amount_spans(text);
        RATE_BARE.captures_iter(text).find_map(|caps| {
            let m = caps.get(1)?;
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            let joined = |c: Option<char>| matches!(c, Some('.' | ',' | '-' | '/' | ':' | '%'));
            if joined(before) || joined(after) || !self.is_accepted(m.as_str()) {
                return None;
            }
            if follows_currency(&text[..m.start()])
                || amounts.iter().any(|span| span.contains(&m.start()))
            {
                return None;
            }
            Some(self.normalize(m.as_str()))
        })
    }
}

/// Byte ranges of every VAT and total amount literal.
fn amount_spans(text: &str) -> Vec<Range<usize>> {
    [&*VAT_AMOUNT, &*VAT_AMOUNT_LOOSE, &*TOTAL_AMOUNT, &*TOTAL_AMOUNT_LOOSE]
        .into_iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(caps.len() - 1))
        .map(|m| m.range())
        .collect()
}

/// Whether `preceding` ends with a currency marker such as `AED` or `Dhs`.
fn follows_currency(preceding: &str) -> bool {
    let preceding = preceding.trim_end();
    ["aed", "dhs"].iter().any(|marker| {
        preceding
            .len()
            .checked_sub(marker.len())
            .and_then(|start| preceding.get(start..))
            .is_some_and(|tail| tail.eq_ignore_ascii_case(marker))
    })
}

impl Default for VatRateExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl FieldExtractor for VatRateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match::<String>(
            text,
            &[
                &|t: &str| self.labeled(t),
                &|t: &str| self.percent(t),
                &|t: &str| self.bare(t),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        VatRateExtractor::default().extract(text)
    }

    #[test]
    fn test_normalize() {
        let extractor = VatRateExtractor::default();
        assert_eq!(extractor.normalize("5 %"), "5%");
        assert_eq!(extractor.normalize("5.00%"), "5%");
        assert_eq!(extractor.normalize("0"), "0");
        assert_eq!(extractor.normalize("10 %"), "10%");
    }

    #[test]
    fn test_labeled_rate_kept_even_if_wrong() {
        assert_eq!(extract("VAT 5%"), Some("5%".to_string()));
        assert_eq!(extract("VAT Rate: 0 %"), Some("0%".to_string()));
        assert_eq!(extract("VAT @ 10% applied"), Some("10%".to_string()));
    }

    #[test]
    fn test_percent_token() {
        assert_eq!(
            extract("Total AED 1000.00 VAT AED 50.00 5%"),
            Some("5%".to_string())
        );
        assert_eq!(
            extract("Discount 10% then 5 % tax"),
            Some("5%".to_string())
        );
    }

    #[test]
    fn test_bare_token() {
        assert_eq!(extract("Rate 5 applies"), Some("5".to_string()));
        assert_eq!(extract("AED 0.00 due on 15-03-2024"), None);
        assert_eq!(extract("Qty 3 units"), None);
    }

    #[test]
    fn test_amounts_are_not_rates() {
        assert_eq!(extract("Total AED 1000 VAT AED 0"), None);
        assert_eq!(extract("VAT Dhs 5 due"), None);
        assert_eq!(extract("Total 5 paid"), None);
        assert_eq!(extract("Total AED 1000 VAT AED 0 rate 0"), Some("0".to_string()));
    }

    #[test]
    fn test_absent() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("Invoice INV-001"), None);
    }
}
