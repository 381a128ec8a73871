//! Rule-based extractor turning invoice text into a [`FieldSet`].

use std::time::Instant;

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::fields::FieldSet;

use super::InvoiceExtractor;
use super::rules::{
    AmountExtractor, AmountKind, DateExtractor, FieldExtractor, InvoiceNumberExtractor,
    PartyExtractor, PartyRole, TrnExtractor, VatRateExtractor, detect_markers,
};

/// Rule-based invoice field extractor.
pub struct InvoiceFieldExtractor {
    trn: TrnExtractor,
    number: InvoiceNumberExtractor,
    date: DateExtractor,
    vat_rate: VatRateExtractor,
    vat_amount: AmountExtractor,
    total_amount: AmountExtractor,
    supplier: PartyExtractor,
    customer: PartyExtractor,
}

impl InvoiceFieldExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            trn: TrnExtractor::from_config(config),
            number: InvoiceNumberExtractor::new(),
            date: DateExtractor::new(),
            vat_rate: VatRateExtractor::from_config(config),
            vat_amount: AmountExtractor::new(AmountKind::Vat),
            total_amount: AmountExtractor::new(AmountKind::Total),
            supplier: PartyExtractor::new(PartyRole::Supplier),
            customer: PartyExtractor::new(PartyRole::Customer),
        }
    }
}

impl Default for InvoiceFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for InvoiceFieldExtractor {
    fn extract(&self, text: &str) -> FieldSet {
        let start = Instant::now();
        let text_lower = text.to_lowercase();
        let markers = detect_markers(&text_lower);

        let fields = FieldSet {
            trn: self.trn.extract(text),
            invoice_number: self.number.extract(text),
            invoice_date: self.date.extract(text),
            vat_rate: self.vat_rate.extract(text),
            vat_amount: self.vat_amount.extract(text),
            total_amount: self.total_amount.extract(text),
            supplier: self.supplier.extract(text),
            customer: self.customer.extract(text),
            currency_present: markers.currency_present,
            has_tax_invoice_label: markers.has_tax_invoice_label,
            has_simplified_label: markers.has_simplified_label,
            has_description_section: markers.has_description_section,
            text_lower,
        };

        debug!(
            trn = ?fields.trn,
            invoice_number = ?fields.invoice_number,
            vat_rate = ?fields.vat_rate,
            elapsed_us = (start.elapsed().as_micros() as u64),
            "Extracted fields from {} characters of text",
            text.len()
        );

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const COMPLIANT: &str = "Tax Invoice No: INV-001 Date: 15-03-2024 TRN 100123456789012 Total AED 1000.00 VAT AED 50.00 5%";

    #[test]
    fn test_extract_single_line_invoice() {
        let fields = InvoiceFieldExtractor::new().extract(COMPLIANT);

        assert_eq!(fields.trn.as_deref(), Some("100123456789012"));
        assert_eq!(fields.invoice_number.as_deref(), Some("INV-001"));
        assert_eq!(fields.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(fields.vat_rate.as_deref(), Some("5%"));
        assert_eq!(fields.total_amount, Some(Decimal::new(100_000, 2)));
        assert_eq!(fields.vat_amount, Some(Decimal::new(5_000, 2)));
        assert!(fields.currency_present);
        assert!(fields.has_tax_invoice_label);
        assert!(!fields.has_simplified_label);
    }

    #[test]
    fn test_extract_multi_line_invoice() {
        let text = r#"
            SIMPLIFIED TAX INVOICE
            Supplier: Gulf Trading LLC
            Tax Registration Number: 100 2345 6789 0123
            Customer: Marina Cafe
            Invoice Number: 2024/0042
            Invoice Date: 2 April 2024

            Description          Qty     Amount
            Coffee beans          2      400.00

            VAT Amount: AED 20.00
            Total Amount Due: AED 420.00
        "#;

        let fields = InvoiceFieldExtractor::new().extract(text);

        assert_eq!(fields.trn.as_deref(), Some("100234567890123"));
        assert_eq!(fields.invoice_number.as_deref(), Some("2024/0042"));
        assert_eq!(fields.parsed_date(), NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(fields.supplier.as_deref(), Some("Gulf Trading LLC"));
        assert_eq!(fields.customer.as_deref(), Some("Marina Cafe"));
        assert_eq!(fields.vat_amount, Some(Decimal::new(2_000, 2)));
        assert_eq!(fields.total_amount, Some(Decimal::new(42_000, 2)));
        assert_eq!(fields.vat_rate, None);
        assert!(fields.has_simplified_label);
        assert!(fields.has_description_section);
    }

    #[test]
    fn test_extract_empty_text() {
        let fields = InvoiceFieldExtractor::new().extract("");
        assert_eq!(fields, FieldSet::default());
    }

    #[test]
    fn test_adversarial_text_does_not_panic() {
        let extractor = InvoiceFieldExtractor::new();
        for text in [
            "%%%%",
            "VAT",
            "Total AED ,,,.",
            "Date: 99-99-9999",
            "Invoice #",
            "ü Dirham 5٪ 100١٢٣",
            "\n\n\t",
        ] {
            let _ = extractor.extract(text);
        }
    }
}
