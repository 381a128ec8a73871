//! Core library for UAE FTA tax invoice validation.
//!
//! This crate provides:
//! - Rule-based field extraction from invoice text (TRN, number, date, VAT, totals, parties)
//! - Compliance rule evaluation producing an itemized verdict
//! - Session-scoped batch aggregation with duplicate invoice number detection
//! - Flat export rows for CSV / JSON output

pub mod batch;
pub mod compliance;
pub mod error;
pub mod export;
pub mod invoice;
pub mod models;

pub use batch::{Batch, BatchId, BatchStore, DocumentResult, ValidationSession};
pub use compliance::RuleEvaluator;
pub use error::{FtaError, Result};
pub use export::{COLUMNS, ExportRow};
pub use invoice::{InvoiceExtractor, InvoiceFieldExtractor};
pub use models::config::FtaConfig;
pub use models::fields::{FieldSet, RawDocument};
pub use models::verdict::{InvoiceType, Remark, Severity, Status, Verdict};
