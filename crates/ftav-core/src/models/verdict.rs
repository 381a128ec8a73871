//! Compliance verdict produced by the rule evaluator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remark substituted when no rule produced anything.
pub const ALL_CHECKS_PASSED: &str = "All mandatory FTA checks passed.";

/// Overall approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Approved,
    NotApproved,
}

impl Status {
    /// Human-readable label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Approved => "Approved",
            Status::NotApproved => "Not Approved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remark severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Compliance failure; forces `NotApproved`.
    Hard,
    /// Advisory note; never affects status.
    Info,
}

/// A single itemized finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remark {
    pub severity: Severity,
    pub message: String,
}

impl Remark {
    pub fn hard(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Hard,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }
}

/// Invoice classification by total amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    FullTaxInvoice,
    SimplifiedTaxInvoice,
    #[default]
    Unknown,
}

impl InvoiceType {
    /// Human-readable label; empty for `Unknown`.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceType::FullTaxInvoice => "Full Tax Invoice",
            InvoiceType::SimplifiedTaxInvoice => "Simplified Tax Invoice",
            InvoiceType::Unknown => "",
        }
    }
}

/// Verdict for one document.
///
/// `status` is `NotApproved` exactly when `remarks` holds a hard remark.
/// Fields are private so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VerdictRecord")]
pub struct Verdict {
    status: Status,
    remarks: Vec<Remark>,
    derived_type: InvoiceType,
}

impl Verdict {
    /// Build a verdict from remarks in rule order.
    pub fn new(remarks: Vec<Remark>, derived_type: InvoiceType) -> Self {
        let mut verdict = Self {
            status: Status::Approved,
            remarks,
            derived_type,
        };
        verdict.settle();
        verdict
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remarks(&self) -> &[Remark] {
        &self.remarks
    }

    pub fn derived_type(&self) -> InvoiceType {
        self.derived_type
    }

    pub fn is_approved(&self) -> bool {
        self.status == Status::Approved
    }

    /// Whether any remark carries exactly this message.
    pub fn has_remark(&self, message: &str) -> bool {
        self.remarks.iter().any(|r| r.message == message)
    }

    /// Messages of all hard remarks, in order.
    pub fn hard_messages(&self) -> Vec<&str> {
        self.remarks
            .iter()
            .filter(|r| r.is_hard())
            .map(|r| r.message.as_str())
            .collect()
    }

    /// Append a remark found after evaluation (batch-level checks).
    pub fn push(&mut self, remark: Remark) {
        self.remarks
            .retain(|r| !(r.severity == Severity::Info && r.message == ALL_CHECKS_PASSED));
        self.remarks.push(remark);
        self.settle();
    }

    /// Remark messages joined for a single export cell.
    pub fn joined_remarks(&self) -> String {
        self.remarks
            .iter()
            .map(|r| r.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn settle(&mut self) {
        if self.remarks.is_empty() {
            self.remarks.push(Remark::info(ALL_CHECKS_PASSED));
        }
        self.status = if self.remarks.iter().any(Remark::is_hard) {
            Status::NotApproved
        } else {
            Status::Approved
        };
    }
}

/// Stored verdict; the status is derived again from the remarks on load.
#[derive(Deserialize)]
struct VerdictRecord {
    remarks: Vec<Remark>,
    #[serde(default)]
    derived_type: InvoiceType,
}

impl From<VerdictRecord> for Verdict {
    fn from(record: VerdictRecord) -> Self {
        Verdict::new(record.remarks, record.derived_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_remarks_get_placeholder() {
        let verdict = Verdict::new(Vec::new(), InvoiceType::Unknown);
        assert!(verdict.is_approved());
        assert_eq!(verdict.remarks(), &[Remark::info(ALL_CHECKS_PASSED)]);
    }

    #[test]
    fn test_info_does_not_affect_status() {
        let verdict = Verdict::new(
            vec![Remark::info("Missing total or VAT amount")],
            InvoiceType::Unknown,
        );
        assert_eq!(verdict.status(), Status::Approved);
        assert!(!verdict.has_remark(ALL_CHECKS_PASSED));
    }

    #[test]
    fn test_push_hard_flips_status_and_drops_placeholder() {
        let mut verdict = Verdict::new(Vec::new(), InvoiceType::SimplifiedTaxInvoice);
        verdict.push(Remark::hard("Duplicate invoice number within batch"));

        assert_eq!(verdict.status(), Status::NotApproved);
        assert_eq!(
            verdict.hard_messages(),
            vec!["Duplicate invoice number within batch"]
        );
        assert_eq!(verdict.remarks().len(), 1);
    }

    #[test]
    fn test_deserialize_recomputes_status() {
        let json = r#"{
            "status": "Approved",
            "remarks": [{"severity": "hard", "message": "Invoice number missing"}],
            "derived_type": "full_tax_invoice"
        }"#;
        let verdict: Verdict = serde_json::from_str(json).unwrap();
        assert_eq!(verdict.status(), Status::NotApproved);
        assert_eq!(verdict.derived_type(), InvoiceType::FullTaxInvoice);

        let verdict: Verdict = serde_json::from_str(r#"{"remarks": []}"#).unwrap();
        assert!(verdict.is_approved());
        assert_eq!(verdict.remarks(), &[Remark::info(ALL_CHECKS_PASSED)]);

        let original = Verdict::new(
            vec![Remark::info("Discount applied")],
            InvoiceType::SimplifiedTaxInvoice,
        );
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(serde_json::from_str::<Verdict>(&json).unwrap(), original);
    }

    #[test]
    fn test_joined_remarks() {
        let verdict = Verdict::new(
            vec![Remark::hard("Invoice number missing"), Remark::info("Discount")],
            InvoiceType::Unknown,
        );
        assert_eq!(verdict.joined_remarks(), "Invoice number missing, Discount");
    }
}
