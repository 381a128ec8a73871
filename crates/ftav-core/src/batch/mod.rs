//! Batch aggregation of evaluated documents.
//!
//! A batch is created from one submission of documents, can be read or
//! deleted as a whole, and is never edited in place.

mod session;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fields::FieldSet;
use crate::models::verdict::Verdict;

pub use session::ValidationSession;
pub use store::BatchStore;

/// Length of a generated batch identifier.
pub const BATCH_ID_LEN: usize = 8;

/// Short batch identifier, immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(uuid[..BATCH_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extraction and evaluation outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document display name.
    pub name: String,
    pub fields: FieldSet,
    pub verdict: Verdict,
}

impl DocumentResult {
    pub fn new(name: impl Into<String>, fields: FieldSet, verdict: Verdict) -> Self {
        Self {
            name: name.into(),
            fields,
            verdict,
        }
    }
}

/// A stored batch: its id and the documents in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub documents: Vec<DocumentResult>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of approved documents.
    pub fn approved(&self) -> usize {
        self.documents
            .iter()
            .filter(|doc| doc.verdict.is_approved())
            .count()
    }
}
