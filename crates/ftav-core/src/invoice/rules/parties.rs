//! Supplier and customer name extraction.

use regex::Regex;

use super::patterns::{CUSTOMER, CUSTOMER_BILL_TO, FIELD_LABEL, SUPPLIER, SUPPLIER_FROM};
use super::{FieldExtractor, first_match};

/// Which party to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Supplier,
    Customer,
}

/// Party name extractor.
pub struct PartyExtractor {
    role: PartyRole,
}

impl PartyExtractor {
    pub fn new(role: PartyRole) -> Self {
        Self { role }
    }

    fn patterns(&self) -> [&'static Regex; 2] {
        match self.role {
            PartyRole::Supplier => [&*SUPPLIER, &*SUPPLIER_FROM],
            PartyRole::Customer => [&*CUSTOMER, &*CUSTOMER_BILL_TO],
        }
    }
}

impl FieldExtractor for PartyExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let [labeled, fallback] = self.patterns();
        first_match::<String>(
            text,
            &[
                &|t: &str| capture_name(labeled, t),
                &|t: &str| capture_name(fallback, t),
            ],
        )
    }
}

/// First capture of `pattern`, cut at the next field label so that
/// single-line texts do not swallow the rest of the invoice.
fn capture_name(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures_iter(text).find_map(|caps| {
        let raw = caps.get(1)?.as_str();
        let cut = FIELD_LABEL.find(raw).map(|m| m.start()).unwrap_or(raw.len());
        let name = raw[..cut].trim().trim_end_matches([',', '-', '.', '&']).trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
