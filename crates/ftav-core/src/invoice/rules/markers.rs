//! Presence markers: currency, tax-invoice label and description section.

/// Currency markers for the UAE dirham, lower-case.
pub const CURRENCY_MARKERS: &[&str] = &["aed", "dhs", "dirham"];

/// Boolean markers found in the lower-cased text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub currency_present: bool,
    pub has_tax_invoice_label: bool,
    pub has_simplified_label: bool,
    pub has_description_section: bool,
}

/// Detect markers in already lower-cased text.
pub fn detect_markers(text_lower: &str) -> Markers {
    Markers {
        currency_present: CURRENCY_MARKERS.iter().any(|m| text_lower.contains(m)),
        has_tax_invoice_label: text_lower.contains("tax invoice"),
        has_simplified_label: text_lower.contains("simplified tax invoice"),
        has_description_section: text_lower.contains("description"),
    }
}
