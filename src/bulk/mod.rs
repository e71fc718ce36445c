//! Bulk mutation coordinator
//!
//! One request runs through three steps on a single task:
//!
//! 1. [`resolver`] classifies every item in order and stages writes,
//! 2. [`writer`] submits the staged writes in one store call and demotes
//!    provisional results if that call fails,
//! 3. [`aggregator`] counts the outcome.

pub mod aggregator;
pub mod request;
pub mod resolver;
pub mod result;
pub mod writer;

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::storage::DocumentStore;

pub use request::{Mutation, MutationItem, OperationKind};
pub use resolver::{MutationResolver, Resolution};
pub use result::{BatchResponse, ItemOutcome, OperationResult};
pub use writer::{BatchWriter, PendingWrites, Submission, WriteIntent};

#[derive(Clone)]
pub struct BulkCoordinator {
    store: Arc<dyn DocumentStore>,
}

impl BulkCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Applies a heterogeneous batch and reports one result per input item,
    /// in input order.
    pub async fn execute(&self, batch: Vec<Mutation>) -> BatchResponse {
        let started = Instant::now();
        let items = batch.len();

        let Resolution { outcomes, pending } =
            MutationResolver::new(self.store.as_ref()).resolve(batch).await;
        let staged = pending.len();
        let submission = BatchWriter::new(self.store.as_ref()).submit(pending).await;
        let results = writer::reconcile(outcomes, &submission);
        let response = aggregator::aggregate(results, started);

        info!(
            items,
            staged,
            succeeded = response.successful_operations,
            failed = response.failed_operations,
            elapsed_ms = response.processing_time_ms,
            "bulk request completed"
        );
        response
    }

    /// Runs every item under the same operation.
    pub async fn run(&self, kind: OperationKind, items: Vec<MutationItem>) -> BatchResponse {
        info!(operation = %kind, count = items.len(), "bulk request received");
        let batch = items
            .into_iter()
            .map(|item| Mutation::new(kind, item))
            .collect();
        self.execute(batch).await
    }

    pub async fn create(&self, items: Vec<MutationItem>) -> BatchResponse {
        self.run(OperationKind::Create, items).await
    }

    pub async fn update(&self, items: Vec<MutationItem>) -> BatchResponse {
        self.run(OperationKind::Update, items).await
    }

    pub async fn upsert(&self, items: Vec<MutationItem>) -> BatchResponse {
        self.run(OperationKind::Upsert, items).await
    }

    pub async fn delete(&self, ids: Vec<String>) -> BatchResponse {
        let items = ids
            .into_iter()
            .map(|id| MutationItem::Parsed(crate::core::MutationRequest::with_id(id)))
            .collect();
        self.run(OperationKind::Delete, items).await
    }
}
