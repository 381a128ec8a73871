//! Configuration structures for extraction, rule evaluation and batching.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FtaError, Result};

/// Main configuration for the ftav pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FtaConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Rule evaluation configuration.
    pub rules: RuleConfig,

    /// Batch aggregation configuration.
    pub batch: BatchConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Fixed leading digits of every TRN.
    pub trn_prefix: String,

    /// Number of digits following the prefix (12 gives a 15-digit TRN).
    pub trn_trailing_digits: usize,

    /// Standard VAT rate in percent.
    pub standard_vat_rate: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            trn_prefix: "100".to_string(),
            trn_trailing_digits: 12,
            standard_vat_rate: Decimal::new(5, 0),
        }
    }
}

impl ExtractionConfig {
    /// Total number of digits in a well-formed TRN.
    pub fn trn_length(&self) -> usize {
        self.trn_prefix.len() + self.trn_trailing_digits
    }
}

/// Rule evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Maximum accepted absolute difference between declared and expected VAT.
    pub vat_tolerance: Decimal,

    /// Totals at or above this amount make a full tax invoice.
    pub full_invoice_threshold: Decimal,

    /// Reference "today" for the future-date check. Uses the local date when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,

    /// Emit a hard remark for every mandatory keyword absent from the text.
    pub strict_mandatory_fields: bool,

    /// Keywords checked by the strict mandatory-field sweep.
    pub mandatory_keywords: Vec<String>,

    /// Recipient-liability wording that must accompany a reverse charge mention.
    pub reverse_charge_phrases: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            vat_tolerance: Decimal::new(5, 1),
            full_invoice_threshold: Decimal::new(10_000, 0),
            reference_date: None,
            strict_mandatory_fields: false,
            mandatory_keywords: [
                "invoice number",
                "date",
                "supplier",
                "customer",
                "description",
                "amount",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reverse_charge_phrases: [
                "recipient is required to account for",
                "recipient is liable to account for",
                "recipient of the supply is liable",
                "customer is required to account for",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Batch aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Flag repeated invoice numbers within a batch.
    pub detect_duplicates: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            detect_duplicates: true,
        }
    }
}

impl FtaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values no extractor or rule could work with.
    pub fn check(&self) -> Result<()> {
        let prefix = &self.extraction.trn_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(FtaError::Config(format!(
                "trn_prefix must be a non-empty digit string, got {prefix:?}"
            )));
        }
        if self.extraction.trn_trailing_digits == 0 {
            return Err(FtaError::Config(
                "trn_trailing_digits must be positive".to_string(),
            ));
        }
        let rate = self.extraction.standard_vat_rate;
        if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED {
            return Err(FtaError::Config(format!(
                "standard_vat_rate must be between 0 and 100, got {rate}"
            )));
        }
        if self.rules.vat_tolerance.is_sign_negative() {
            return Err(FtaError::Config(
                "vat_tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
