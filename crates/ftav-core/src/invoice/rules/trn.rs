//! TRN (UAE Tax Registration Number) extraction and validation.

use tracing::debug;

use crate::models::config::ExtractionConfig;

use super::patterns::{DIGIT_RUN, TRN_GROUPED, TRN_LABELED};
use super::{FieldExtractor, first_match};

/// Trailing-digit range the unlabeled matcher considers a TRN candidate.
const CANDIDATE_TRAILING: (usize, usize) = (10, 12);

/// TRN field extractor.
pub struct TrnExtractor {
    prefix: String,
    trailing_digits: usize,
}

impl TrnExtractor {
    /// Create a new TRN extractor for the given prefix and digit count.
    pub fn new(prefix: impl Into<String>, trailing_digits: usize) -> Self {
        Self {
            prefix: prefix.into(),
            trailing_digits,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.trn_prefix.clone(), config.trn_trailing_digits)
    }

    fn accept(&self, digits: String) -> Option<String> {
        if is_valid_trn(&digits, &self.prefix, self.trailing_digits) {
            Some(digits)
        } else {
            debug!("Rejected TRN candidate {} (wrong shape)", digits);
            None
        }
    }

    /// `TRN: 100123456789012`
    fn labeled(&self, text: &str) -> Option<String> {
        TRN_LABELED
            .captures_iter(text)
            .find_map(|caps| self.accept(caps[1].to_string()))
    }

    /// `TRN: 100 1234 5678 9012`
    fn grouped(&self, text: &str) -> Option<String> {
        TRN_GROUPED.captures_iter(text).find_map(|caps| {
            let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
            self.accept(digits)
        })
    }

    /// First bare digit run that starts with the prefix. Only that first
    /// candidate is considered; if it has the wrong length the TRN is absent.
    fn standalone(&self, text: &str) -> Option<String> {
        let min = self.prefix.len() + CANDIDATE_TRAILING.0.min(self.trailing_digits);
        let max = self.prefix.len() + CANDIDATE_TRAILING.1.max(self.trailing_digits);

        let candidate = DIGIT_RUN
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|run| run.starts_with(&self.prefix) && (min..=max).contains(&run.len()))?;

        self.accept(candidate.to_string())
    }
}

impl Default for TrnExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl FieldExtractor for TrnExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match::<String>(
            text,
            &[
                &|t: &str| self.labeled(t),
                &|t: &str| self.grouped(t),
                &|t: &str| self.standalone(t),
            ],
        )
    }
}

/// Check the canonical TRN shape: the prefix followed by exactly
/// `trailing_digits` digits, nothing else.
pub fn is_valid_trn(trn: &str, prefix: &str, trailing_digits: usize) -> bool {
    trn.len() == prefix.len() + trailing_digits
        && trn.starts_with(prefix)
        && trn.chars().all(|c| c.is_ascii_digit())
}
