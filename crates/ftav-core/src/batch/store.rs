//! Session-scoped batch store.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::models::config::BatchConfig;
use crate::models::verdict::Remark;

use super::{Batch, BatchId, DocumentResult};

pub const DUPLICATE_NUMBER: &str = "Duplicate invoice number within batch";

/// Thread-safe store of batches, in creation order.
///
/// Creation and deletion take the write lock; readers get clones, so a
/// delete racing a read is seen either entirely before or entirely after it.
#[derive(Debug)]
pub struct BatchStore {
    batches: RwLock<Vec<Batch>>,
    detect_duplicates: bool,
}

impl BatchStore {
    /// Create an empty store with duplicate detection enabled.
    pub fn new() -> Self {
        Self {
            batches: RwLock::new(Vec::new()),
            detect_duplicates: true,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new().with_duplicate_detection(config.detect_duplicates)
    }

    /// Enable or disable the within-batch duplicate invoice number check.
    pub fn with_duplicate_detection(mut self, enabled: bool) -> Self {
        self.detect_duplicates = enabled;
        self
    }

    /// Store `documents` as a new batch and return its fresh id.
    pub fn create_batch(&self, mut documents: Vec<DocumentResult>) -> BatchId {
        if self.detect_duplicates {
            flag_duplicates(&mut documents);
        }

        let mut batches = self.write();
        let id = loop {
            let candidate = BatchId::generate();
            if !batches.iter().any(|b| b.id == candidate) {
                break candidate;
            }
        };

        info!("Created batch {} with {} documents", id, documents.len());
        batches.push(Batch {
            id: id.clone(),
            documents,
        });
        id
    }

    /// Remove a batch. Returns whether it existed; a missing id is a no-op.
    pub fn delete_batch(&self, id: &BatchId) -> bool {
        let mut batches = self.write();
        let before = batches.len();
        batches.retain(|b| &b.id != id);
        let removed = batches.len() != before;
        if removed {
            info!("Deleted batch {}", id);
        }
        removed
    }

    /// Remove every batch.
    pub fn clear(&self) {
        let mut batches = self.write();
        info!("Cleared {} batches", batches.len());
        batches.clear();
    }

    pub fn get(&self, id: &BatchId) -> Option<Batch> {
        self.read().iter().find(|b| &b.id == id).cloned()
    }

    /// Snapshot of all batches in creation order.
    pub fn batches(&self) -> Vec<Batch> {
        self.read().clone()
    }

    pub fn batch_ids(&self) -> Vec<BatchId> {
        self.read().iter().map(|b| b.id.clone()).collect()
    }

    /// Every document of every batch, tagged with its batch id.
    pub fn all_results(&self) -> Vec<(BatchId, DocumentResult)> {
        self.read()
            .iter()
            .flat_map(|batch| {
                batch
                    .documents
                    .iter()
                    .map(|doc| (batch.id.clone(), doc.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Batch>> {
        self.batches.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Batch>> {
        self.batches.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BatchStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a hard remark to the second and later documents sharing an invoice number.
fn flag_duplicates(documents: &mut [DocumentResult]) {
    let mut seen = HashSet::new();
    for doc in documents.iter_mut() {
        let Some(number) = doc.fields.invoice_number.clone() else {
            continue;
        };
        if !seen.insert(number.clone()) {
            warn!("Duplicate invoice number {} in {}", number, doc.name);
            doc.verdict.push(Remark::hard(DUPLICATE_NUMBER));
        }
    }
}
