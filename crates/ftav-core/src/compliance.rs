//! FTA compliance rules evaluated against an extracted [`FieldSet`].
//!
//! Rules run in a fixed order and each contributes at most one remark
//! (the mandatory-field sweep may contribute one per keyword). Status is
//! derived from the remarks by [`Verdict`].

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::invoice::rules::is_valid_trn;
use crate::models::config::{ExtractionConfig, FtaConfig, RuleConfig};
use crate::models::fields::{FieldSet, VatRate};
use crate::models::verdict::{InvoiceType, Remark, Verdict};

pub const MISSING_LABEL: &str = "Missing 'Tax Invoice' label";
pub const INVALID_TRN: &str = "Invalid or missing TRN";
pub const MISSING_NUMBER: &str = "Invoice number missing";
pub const MISSING_DATE: &str = "Invoice date missing";
pub const INVALID_DATE: &str = "Invalid date format";
pub const FUTURE_DATE: &str = "Invoice date is in the future";
pub const INVALID_RATE: &str = "VAT rate missing or invalid";
pub const MISSING_AMOUNTS: &str = "Missing total or VAT amount";
pub const CURRENCY_NOT_AED: &str = "Currency not in AED";
pub const REVERSE_CHARGE_INCOMPLETE: &str = "Reverse charge wording missing/incomplete";
pub const DISCOUNT_APPLIED: &str = "Discount applied — ensure VAT recalculated";
pub const EXEMPT_WORDING: &str = "Tax-exempt / out-of-scope wording present — verify compliance";

const EXEMPT_PHRASES: &[&str] = &["tax exempt", "tax-exempt", "out of scope", "out-of-scope"];

/// Rule evaluator for UAE tax invoices.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    rules: RuleConfig,
    extraction: ExtractionConfig,
}

impl RuleEvaluator {
    pub fn new(rules: RuleConfig, extraction: ExtractionConfig) -> Self {
        Self { rules, extraction }
    }

    pub fn from_config(config: &FtaConfig) -> Self {
        Self::new(config.rules.clone(), config.extraction.clone())
    }

    /// Evaluate against the configured reference date, or the local date.
    pub fn evaluate(&self, fields: &FieldSet) -> Verdict {
        let today = self
            .rules
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        self.evaluate_on(fields, today)
    }

    /// Evaluate with an explicit "today" for the future-date check.
    pub fn evaluate_on(&self, fields: &FieldSet, today: NaiveDate) -> Verdict {
        let checks = [
            self.check_label(fields),
            self.check_trn(fields),
            self.check_invoice_number(fields),
            self.check_date(fields, today),
            self.check_vat_rate(fields),
            self.check_vat_amount(fields),
            self.check_currency(fields),
            self.check_reverse_charge(fields),
            self.check_discount(fields),
            self.check_exempt_wording(fields),
        ];

        let mut remarks: Vec<Remark> = checks.into_iter().flatten().collect();
        if self.rules.strict_mandatory_fields {
            remarks.extend(self.sweep_mandatory_fields(fields));
        }

        for remark in remarks.iter().filter(|r| r.is_hard()) {
            debug!("Rule failed: {}", remark.message);
        }

        let verdict = Verdict::new(remarks, self.derive_type(fields));
        info!(
            status = %verdict.status(),
            remarks = verdict.remarks().len(),
            "Evaluated invoice {}",
            fields.invoice_number.as_deref().unwrap_or("<unnumbered>")
        );
        verdict
    }

    /// Full tax invoice at or above the threshold, simplified below it.
    pub fn derive_type(&self, fields: &FieldSet) -> InvoiceType {
        match fields.total_amount {
            Some(total) if total >= self.rules.full_invoice_threshold => {
                InvoiceType::FullTaxInvoice
            }
            Some(_) => InvoiceType::SimplifiedTaxInvoice,
            None if fields.has_simplified_label => InvoiceType::SimplifiedTaxInvoice,
            None => InvoiceType::Unknown,
        }
    }

    fn check_label(&self, fields: &FieldSet) -> Option<Remark> {
        (!fields.has_tax_invoice_label).then(|| Remark::hard(MISSING_LABEL))
    }

    fn check_trn(&self, fields: &FieldSet) -> Option<Remark> {
        let valid = fields.trn.as_deref().is_some_and(|trn| {
            is_valid_trn(
                trn,
                &self.extraction.trn_prefix,
                self.extraction.trn_trailing_digits,
            )
        });
        (!valid).then(|| Remark::hard(INVALID_TRN))
    }

    fn check_invoice_number(&self, fields: &FieldSet) -> Option<Remark> {
        let present = fields
            .invoice_number
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        (!present).then(|| Remark::hard(MISSING_NUMBER))
    }

    fn check_date(&self, fields: &FieldSet, today: NaiveDate) -> Option<Remark> {
        match &fields.invoice_date {
            None => Some(Remark::hard(MISSING_DATE)),
            Some(date) => match date.parsed {
                None => Some(Remark::hard(INVALID_DATE)),
                Some(parsed) if parsed > today => Some(Remark::hard(FUTURE_DATE)),
                Some(_) => None,
            },
        }
    }

    fn check_vat_rate(&self, fields: &FieldSet) -> Option<Remark> {
        let canonical = fields
            .vat_rate
            .as_deref()
            .is_some_and(|rate| VatRate::is_canonical(rate, self.extraction.standard_vat_rate));
        (!canonical).then(|| Remark::hard(INVALID_RATE))
    }

    fn check_vat_amount(&self, fields: &FieldSet) -> Option<Remark> {
        let (Some(vat), Some(total)) = (fields.vat_amount, fields.total_amount) else {
            return Some(Remark::info(MISSING_AMOUNTS));
        };

        let zero_rated = fields.vat_rate.as_deref().is_some_and(|rate| {
            VatRate::classify(rate, self.extraction.standard_vat_rate) == VatRate::Zero
        });
        if zero_rated {
            return None;
        }

        let expected = self.expected_vat(total);
        if (vat - expected).abs() > self.rules.vat_tolerance {
            return Some(Remark::hard(format!(
                "VAT mismatch (expected {:.2}, found {:.2})",
                expected, vat
            )));
        }
        None
    }

    /// VAT due on `total` at the standard rate, rounded to fils.
    pub fn expected_vat(&self, total: Decimal) -> Decimal {
        let gross = total.saturating_mul(self.extraction.standard_vat_rate);
        (gross / Decimal::ONE_HUNDRED).round_dp(2)
    }

    fn check_currency(&self, fields: &FieldSet) -> Option<Remark> {
        (!fields.currency_present).then(|| Remark::hard(CURRENCY_NOT_AED))
    }

    fn check_reverse_charge(&self, fields: &FieldSet) -> Option<Remark> {
        if !fields.mentions("reverse charge") {
            return None;
        }
        let worded = self
            .rules
            .reverse_charge_phrases
            .iter()
            .any(|phrase| fields.mentions(&phrase.to_lowercase()));
        (!worded).then(|| Remark::hard(REVERSE_CHARGE_INCOMPLETE))
    }

    fn check_discount(&self, fields: &FieldSet) -> Option<Remark> {
        fields
            .mentions("discount")
            .then(|| Remark::info(DISCOUNT_APPLIED))
    }

    fn check_exempt_wording(&self, fields: &FieldSet) -> Option<Remark> {
        EXEMPT_PHRASES
            .iter()
            .any(|phrase| fields.mentions(phrase))
            .then(|| Remark::info(EXEMPT_WORDING))
    }

    fn sweep_mandatory_fields<'a>(
        &'a self,
        fields: &'a FieldSet,
    ) -> impl Iterator<Item = Remark> + 'a {
        self.rules
            .mandatory_keywords
            .iter()
            .filter(|keyword| !fields.mentions(&keyword.to_lowercase()))
            .map(|keyword| Remark::hard(format!("Mandatory field missing: {keyword}")))
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::from_config(&FtaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceExtractor, InvoiceFieldExtractor};
    use crate::models::verdict::{ALL_CHECKS_PASSED, Status};
    use pretty_assertions::assert_eq;

    const COMPLIANT: &str = "Tax Invoice No: INV-001 Date: 15-03-2024 TRN 100123456789012 Total AED 1000.00 VAT AED 50.00 5%";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn evaluate(text: &str) -> Verdict {
        let fields = InvoiceFieldExtractor::new().extract(text);
        RuleEvaluator::default().evaluate_on(&fields, today())
    }

    fn messages(verdict: &Verdict) -> Vec<&str> {
        verdict.remarks().iter().map(|r| r.message.as_str()).collect()
    }

    fn amounts(total: Decimal, vat: Decimal) -> FieldSet {
        FieldSet {
            total_amount: Some(total),
            vat_amount: Some(vat),
            vat_rate: Some("5%".to_string()),
            ..FieldSet::default()
        }
    }

    #[test]
    fn test_compliant_invoice() {
        let verdict = evaluate(COMPLIANT);
        assert_eq!(verdict.status(), Status::Approved);
        assert_eq!(verdict.derived_type(), InvoiceType::SimplifiedTaxInvoice);
        assert_eq!(messages(&verdict), vec![ALL_CHECKS_PASSED]);
    }

    #[test]
    fn test_future_date() {
        let verdict = evaluate(&COMPLIANT.replace("2024", "2099"));
        assert_eq!(verdict.status(), Status::NotApproved);
        assert_eq!(verdict.hard_messages(), vec![FUTURE_DATE]);
    }

    #[test]
    fn test_date_equal_to_today_is_not_future() {
        let verdict = evaluate(&COMPLIANT.replace("15-03-2024", "01-06-2024"));
        assert!(verdict.is_approved());
    }

    #[test]
    fn test_invalid_date_format() {
        let verdict = evaluate(&COMPLIANT.replace("15-03-2024", "32-01-2024"));
        assert_eq!(verdict.hard_messages(), vec![INVALID_DATE]);
    }

    #[test]
    fn test_empty_text() {
        let verdict = evaluate("");
        assert_eq!(verdict.status(), Status::NotApproved);
        assert_eq!(
            verdict.hard_messages(),
            vec![
                MISSING_LABEL,
                INVALID_TRN,
                MISSING_NUMBER,
                MISSING_DATE,
                INVALID_RATE,
                CURRENCY_NOT_AED,
            ]
        );
        assert!(verdict.has_remark(MISSING_AMOUNTS));
        assert_eq!(verdict.derived_type(), InvoiceType::Unknown);
    }

    #[test]
    fn test_vat_tolerance_boundary() {
        let evaluator = RuleEvaluator::default();
        let total = Decimal::new(1000, 0);

        let within = evaluator.evaluate_on(&amounts(total, Decimal::new(5049, 2)), today());
        assert!(!messages(&within).iter().any(|m| m.starts_with("VAT mismatch")));

        let outside = evaluator.evaluate_on(&amounts(total, Decimal::new(5051, 2)), today());
        assert!(outside.has_remark("VAT mismatch (expected 50.00, found 50.51)"));
    }

    #[test]
    fn test_expected_vat_saturates() {
        let mut config = FtaConfig::default();
        config.extraction.standard_vat_rate = Decimal::ONE_HUNDRED;
        let evaluator = RuleEvaluator::from_config(&config);

        assert_eq!(evaluator.expected_vat(Decimal::new(1000, 0)), Decimal::new(1000, 0));
        assert_eq!(
            evaluator.expected_vat(Decimal::MAX),
            (Decimal::MAX / Decimal::ONE_HUNDRED).round_dp(2)
        );
    }

    #[test]
    fn test_zero_rated_skips_vat_math() {
        let evaluator = RuleEvaluator::default();
        let mut fields = amounts(Decimal::new(1000, 0), Decimal::ZERO);
        fields.vat_rate = Some("0%".to_string());

        let verdict = evaluator.evaluate_on(&fields, today());
        assert!(!messages(&verdict).iter().any(|m| m.starts_with("VAT mismatch")));
        assert!(!verdict.has_remark(INVALID_RATE));
    }

    #[test]
    fn test_undeclared_rate_with_zero_vat() {
        let verdict = evaluate(
            "Tax Invoice No: A1 Date: 15-03-2024 TRN 100123456789012 Total AED 1000 VAT AED 0",
        );
        assert_eq!(verdict.status(), Status::NotApproved);
        assert_eq!(
            verdict.hard_messages(),
            vec![INVALID_RATE, "VAT mismatch (expected 50.00, found 0.00)"]
        );
    }

    #[test]
    fn test_non_canonical_rate() {
        let verdict = evaluate(&COMPLIANT.replace("5%", "VAT 10%"));
        assert_eq!(verdict.hard_messages(), vec![INVALID_RATE]);
    }

    #[test]
    fn test_reverse_charge_wording() {
        let bare = evaluate(&format!("{COMPLIANT} Reverse charge applies"));
        assert_eq!(bare.hard_messages(), vec![REVERSE_CHARGE_INCOMPLETE]);

        let worded = evaluate(&format!(
            "{COMPLIANT} Reverse charge: the recipient is required to account for VAT"
        ));
        assert!(worded.is_approved());
    }

    #[test]
    fn test_info_remarks_keep_approval() {
        let verdict = evaluate(&format!(
            "{COMPLIANT} Discount given. Some items are out of scope."
        ));
        assert!(verdict.is_approved());
        assert_eq!(messages(&verdict), vec![DISCOUNT_APPLIED, EXEMPT_WORDING]);
    }

    #[test]
    fn test_strict_mandatory_sweep() {
        let mut config = FtaConfig::default();
        config.rules.strict_mandatory_fields = true;
        let evaluator = RuleEvaluator::from_config(&config);

        let fields = InvoiceFieldExtractor::new().extract(COMPLIANT);
        let verdict = evaluator.evaluate_on(&fields, today());

        assert_eq!(
            verdict.hard_messages(),
            vec![
                "Mandatory field missing: invoice number",
                "Mandatory field missing: supplier",
                "Mandatory field missing: customer",
                "Mandatory field missing: description",
                "Mandatory field missing: amount",
            ]
        );
    }

    #[test]
    fn test_derive_type() {
        let evaluator = RuleEvaluator::default();
        let mut fields = FieldSet {
            total_amount: Some(Decimal::new(10_000, 0)),
            ..FieldSet::default()
        };
        assert_eq!(evaluator.derive_type(&fields), InvoiceType::FullTaxInvoice);

        fields.total_amount = Some(Decimal::new(999_999, 2));
        assert_eq!(evaluator.derive_type(&fields), InvoiceType::SimplifiedTaxInvoice);

        fields.total_amount = None;
        assert_eq!(evaluator.derive_type(&fields), InvoiceType::Unknown);

        fields.has_simplified_label = true;
        assert_eq!(evaluator.derive_type(&fields), InvoiceType::SimplifiedTaxInvoice);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let fields = InvoiceFieldExtractor::new().extract(COMPLIANT);
        let evaluator = RuleEvaluator::default();
        assert_eq!(
            evaluator.evaluate_on(&fields, today()),
            evaluator.evaluate_on(&fields, today())
        );
    }
}
