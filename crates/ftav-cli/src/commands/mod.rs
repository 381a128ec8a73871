//! Subcommands and the configuration plumbing they share.

pub mod batch;
pub mod config;
pub mod validate;

use std::path::Path;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use tracing::debug;

use ftav_core::FtaConfig;

/// Command-line overrides for rule and batch settings.
#[derive(Args, Debug, Default)]
pub struct RuleOverrides {
    /// Treat this date as "today" for the future-date check (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    reference_date: Option<NaiveDate>,

    /// Require every mandatory field keyword to appear in the text
    #[arg(long)]
    strict: bool,

    /// Accepted difference between declared and expected VAT
    #[arg(long, value_name = "AED")]
    tolerance: Option<Decimal>,

    /// Do not flag repeated invoice numbers within a batch
    #[arg(long)]
    no_duplicate_check: bool,
}

impl RuleOverrides {
    fn apply(&self, config: &mut FtaConfig) {
        if let Some(date) = self.reference_date {
            config.rules.reference_date = Some(date);
        }
        if self.strict {
            config.rules.strict_mandatory_fields = true;
        }
        if let Some(tolerance) = self.tolerance {
            config.rules.vat_tolerance = tolerance;
        }
        if self.no_duplicate_check {
            config.batch.detect_duplicates = false;
        }
    }
}

/// Load the explicit config file, else the default one if present, else
/// defaults; then apply command-line overrides.
pub fn load_config(
    config_path: Option<&str>,
    overrides: &RuleOverrides,
) -> anyhow::Result<FtaConfig> {
    let mut config = match config_path {
        Some(path) => FtaConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using configuration from {}", default_path.display());
                FtaConfig::from_file(&default_path)?
            } else {
                FtaConfig::default()
            }
        }
    };

    overrides.apply(&mut config);
    config.check()?;
    Ok(config)
}
