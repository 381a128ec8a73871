//! Validation session: extractor, evaluator and batch store bundled for one caller.

use tracing::info;

use crate::compliance::RuleEvaluator;
use crate::export::{self, ExportRow};
use crate::invoice::{InvoiceExtractor, InvoiceFieldExtractor};
use crate::models::config::FtaConfig;
use crate::models::fields::RawDocument;

use super::{BatchId, BatchStore, DocumentResult};

/// A validation session owning its batch state.
///
/// Batches live as long as the session; dropping it discards them.
pub struct ValidationSession {
    extractor: Box<dyn InvoiceExtractor>,
    evaluator: RuleEvaluator,
    store: BatchStore,
}

impl ValidationSession {
    pub fn new(config: &FtaConfig) -> Self {
        Self {
            extractor: Box::new(InvoiceFieldExtractor::from_config(&config.extraction)),
            evaluator: RuleEvaluator::from_config(config),
            store: BatchStore::from_config(&config.batch),
        }
    }

    /// Replace the rule-based extractor with another implementation.
    pub fn with_extractor(mut self, extractor: Box<dyn InvoiceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Extract and evaluate a single document without storing it.
    pub fn evaluate_document(&self, document: &RawDocument) -> DocumentResult {
        let fields = self.extractor.extract(&document.text);
        let verdict = self.evaluator.evaluate(&fields);
        DocumentResult::new(document.name.clone(), fields, verdict)
    }

    /// Evaluate a submission and store it as a new batch.
    pub fn submit(&self, documents: &[RawDocument]) -> BatchId {
        info!("Evaluating submission of {} documents", documents.len());
        let results = documents
            .iter()
            .map(|doc| self.evaluate_document(doc))
            .collect();
        self.store.create_batch(results)
    }

    pub fn delete_batch(&self, id: &BatchId) -> bool {
        self.store.delete_batch(id)
    }

    /// Export rows for one batch, if it exists.
    pub fn batch_rows(&self, id: &BatchId) -> Option<Vec<ExportRow>> {
        self.store.get(id).map(|batch| export::to_rows(&batch))
    }

    /// Export rows across all batches.
    pub fn rows(&self) -> Vec<ExportRow> {
        export::all_rows(&self.store)
    }

    pub fn store(&self) -> &BatchStore {
        &self.store
    }
}

impl Default for ValidationSession {
    fn default() -> Self {
        Self::new(&FtaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::FieldSet;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    struct FixedExtractor;

    impl InvoiceExtractor for FixedExtractor {
        fn extract(&self, _text: &str) -> FieldSet {
            FieldSet {
                invoice_number: Some("FIXED-1".to_string()),
                ..FieldSet::default()
            }
        }
    }

    fn session() -> ValidationSession {
        let mut config = FtaConfig::default();
        config.rules.reference_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        ValidationSession::new(&config)
    }

    #[test]
    fn test_submit_and_export() {
        let session = session();
        let id = session.submit(&[
            RawDocument::new("a.txt", "Tax Invoice No: A-1 Date: 01-01-2024"),
            RawDocument::new("b.txt", ""),
        ]);

        let rows = session.batch_rows(&id).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.document.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(rows[0].invoice_number, "A-1");
        assert_eq!(rows[1].status, "Not Approved");
    }

    #[test]
    fn test_delete_removes_rows() {
        let session = session();
        let first = session.submit(&[RawDocument::new("a.txt", "")]);
        let second = session.submit(&[RawDocument::new("b.txt", "")]);
        assert_eq!(session.rows().len(), 2);

        assert!(session.delete_batch(&first));
        assert!(session.batch_rows(&first).is_none());

        let rows = session.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].batch_id, second.as_str());
    }

    #[test]
    fn test_custom_extractor() {
        let session = session().with_extractor(Box::new(FixedExtractor));
        let id = session.submit(&[
            RawDocument::new("a.txt", "anything"),
            RawDocument::new("b.txt", "anything"),
        ]);

        let batch = session.store().get(&id).unwrap();
        assert_eq!(batch.documents[0].fields.invoice_number.as_deref(), Some("FIXED-1"));
        assert!(batch.documents[1]
            .verdict
            .has_remark("Duplicate invoice number within batch"));
    }
}
