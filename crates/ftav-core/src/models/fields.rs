//! Typed field set extracted from a single invoice text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A document as handed over by the text-extraction collaborator.
///
/// An empty `text` is valid and means nothing could be read from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Display name (usually the file name).
    pub name: String,
    /// Full plain text of the document.
    pub text: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Fields found in one invoice text.
///
/// Produced once by the extractor and never mutated afterwards. Every
/// optional value either satisfies its own shape check or is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// Tax registration number, digits only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,

    /// Invoice identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Issue date as written, with its calendar parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<InvoiceDate>,

    /// Declared VAT rate, whitespace-normalized (`"5%"`, `"0"`, `"10%"`...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<String>,

    /// Declared VAT amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<Decimal>,

    /// Declared total payable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    /// Supplier (seller) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Customer (buyer) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// An AED / Dhs / Dirham marker occurs.
    pub currency_present: bool,

    /// A "Tax Invoice" label occurs.
    pub has_tax_invoice_label: bool,

    /// The label reads "Simplified Tax Invoice".
    pub has_simplified_label: bool,

    /// A line-item "Description" marker occurs.
    pub has_description_section: bool,

    /// Lower-cased full text for substring rules.
    #[serde(skip)]
    pub text_lower: String,
}

/// An issue date candidate.
///
/// `parsed` is `None` when the text matched a date shape that is not a real
/// calendar date (e.g. `32-01-2024`); this is distinct from the date being
/// absent altogether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDate {
    /// Matched substring.
    pub raw: String,
    /// Layout that matched.
    pub format: DateFormat,
    /// Calendar date, if the raw value is valid.
    pub parsed: Option<NaiveDate>,
}

impl InvoiceDate {
    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

/// Recognized date layouts, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `15-03-2024`, `15/03/2024`
    DayMonthYear,
    /// `2024-03-15`, `2024/03/15`
    YearMonthDay,
    /// `15 March 2024`
    DayMonthName,
    /// `March 15, 2024`
    MonthNameDay,
}

/// Classification of a declared VAT rate against the standard rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VatRate {
    /// The standard rate (5% in the UAE).
    Standard,
    /// Zero-rated supply.
    Zero,
    /// Any other value; not acceptable on a tax invoice.
    Other,
}

impl VatRate {
    /// Classify a normalized rate label.
    pub fn classify(label: &str, standard_rate: Decimal) -> Self {
        let number = label.trim().trim_end_matches('%').trim();
        match number.parse::<Decimal>() {
            Ok(rate) if rate.is_zero() => VatRate::Zero,
            Ok(rate) if rate == standard_rate => VatRate::Standard,
            _ => VatRate::Other,
        }
    }

    /// Canonical labels are the bare or percent-suffixed standard and zero rates.
    pub fn is_canonical(label: &str, standard_rate: Decimal) -> bool {
        let number = label.trim_end_matches('%');
        let standard = standard_rate.normalize().to_string();
        number == standard || number == "0"
    }
}

impl FieldSet {
    /// The date parsed to a real calendar date, if any.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.invoice_date.as_ref().and_then(|d| d.parsed)
    }

    /// Whether the lower-cased text contains `needle` (expected lower-case).
    pub fn mentions(&self, needle: &str) -> bool {
        self.text_lower.contains(needle)
    }
}
