use tracing::{debug, error};

use super::result::{ItemOutcome, OperationResult};
use crate::core::{Document, StoreError};
use crate::storage::DocumentStore;

/// A document write waiting for the batch submission, tied to the result
/// slot it confirms.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteIntent {
    pub slot: usize,
    pub id: String,
    pub document: Document,
}

/// Ordered write intents produced by one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingWrites {
    intents: Vec<WriteIntent>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slot: usize, document: Document) {
        self.intents.push(WriteIntent {
            slot,
            id: document.id.clone(),
            document,
        });
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn intents(&self) -> &[WriteIntent] {
        &self.intents
    }

    pub fn contains(&self, id: &str) -> bool {
        self.intents.iter().any(|intent| intent.id == id)
    }

    /// Most recently staged version of `id`.
    pub fn latest(&self, id: &str) -> Option<&Document> {
        self.intents
            .iter()
            .rev()
            .find(|intent| intent.id == id)
            .map(|intent| &intent.document)
    }

    pub fn into_writes(self) -> Vec<(String, Document)> {
        self.intents
            .into_iter()
            .map(|intent| (intent.id, intent.document))
            .collect()
    }
}

/// What happened to the batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was staged, so the store was not called.
    Skipped,
    Committed { count: usize },
    Failed(StoreError),
}

pub struct BatchWriter<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> BatchWriter<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Sends every staged write to the store in a single call.
    pub async fn submit(&self, pending: PendingWrites) -> Submission {
        if pending.is_empty() {
            return Submission::Skipped;
        }

        let count = pending.len();
        debug!(count, "submitting batch write");
        match self.store.batch_write(pending.into_writes()).await {
            Ok(()) => Submission::Committed { count },
            Err(err) => {
                error!(count, error = %err, "bulk write submission failed");
                Submission::Failed(err)
            }
        }
    }
}

/// Finalizes outcomes against the submission result.
///
/// On failure only provisional outcomes are demoted; terminal outcomes pass
/// through unchanged. Order is preserved.
pub fn reconcile(outcomes: Vec<ItemOutcome>, submission: &Submission) -> Vec<OperationResult> {
    let failure = match submission {
        Submission::Failed(err) => Some(err.to_string()),
        Submission::Skipped | Submission::Committed { .. } => None,
    };

    outcomes
        .into_iter()
        .map(|outcome| match (outcome, failure.as_deref()) {
            (ItemOutcome::Provisional(result), Some(message)) => result.demoted(message),
            (outcome, _) => outcome.into_result(),
        })
        .collect()
}
