//! Per-item classification of a bulk request.
//!
//! Each item is resolved in input order against the store (and against writes
//! already staged earlier in the same request). Writes are not applied here:
//! they come back as [`PendingWrites`] for the batch writer. Deletes are the
//! exception and hit the store immediately.

use chrono::Utc;
use tracing::warn;

use super::request::{Mutation, MutationItem, OperationKind};
use super::result::{ItemOutcome, OperationResult, STATUS_CREATED, STATUS_OK};
use super::writer::PendingWrites;
use crate::core::{Document, MutationError, MutationRequest};
use crate::storage::DocumentStore;

pub const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Output of one resolution pass: one outcome per input item, in input
/// order, plus the writes the provisional outcomes depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcomes: Vec<ItemOutcome>,
    pub pending: PendingWrites,
}

enum Resolved {
    /// Needs the batch write to become final.
    Staged {
        operation: OperationKind,
        status: u16,
        document: Document,
    },
    Done(OperationResult),
}

pub struct MutationResolver<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> MutationResolver<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, batch: Vec<Mutation>) -> Resolution {
        let mut outcomes = Vec::with_capacity(batch.len());
        let mut pending = PendingWrites::new();

        for (slot, mutation) in batch.into_iter().enumerate() {
            let resolved = self.resolve_item(&mutation, &pending).await;
            match resolved {
                Ok(Resolved::Staged {
                    operation,
                    status,
                    document,
                }) => {
                    let result = OperationResult::succeeded(document.id.clone(), operation, status);
                    pending.push(slot, document);
                    outcomes.push(ItemOutcome::Provisional(result));
                }
                Ok(Resolved::Done(result)) => outcomes.push(ItemOutcome::Terminal(result)),
                Err(err) => {
                    let id = failure_id(&mutation);
                    warn!(
                        slot,
                        operation = %mutation.kind,
                        id = id.as_deref().unwrap_or("-"),
                        error = %err,
                        "bulk item rejected"
                    );
                    outcomes.push(ItemOutcome::Terminal(OperationResult::failed(
                        id,
                        mutation.kind,
                        &err,
                    )));
                }
            }
        }

        Resolution { outcomes, pending }
    }

    async fn resolve_item(
        &self,
        mutation: &Mutation,
        pending: &PendingWrites,
    ) -> Result<Resolved, MutationError> {
        let request = match &mutation.item {
            MutationItem::Parsed(request) => request,
            MutationItem::Malformed { reason, .. } => {
                return Err(MutationError::validation(reason.clone()));
            }
        };

        match mutation.kind {
            OperationKind::Create => {
                request.validate()?;
                Ok(staged_create(Document::generate_id(), request))
            }
            OperationKind::Update => {
                let id = request.require_id()?;
                request.validate()?;
                let current = self
                    .current(id, pending)
                    .await?
                    .ok_or_else(|| MutationError::not_found(NOT_FOUND_MESSAGE))?;
                Ok(staged_update(current, request))
            }
            OperationKind::Upsert => {
                request.validate()?;
                let Some(id) = request.provided_id() else {
                    return Ok(staged_create(Document::generate_id(), request));
                };
                if !self.is_known(id, pending).await? {
                    return Ok(staged_create(id.to_string(), request));
                }
                // The document can disappear between the check and the read.
                let current = self
                    .current(id, pending)
                    .await?
                    .ok_or_else(|| MutationError::not_found(NOT_FOUND_MESSAGE))?;
                Ok(staged_update(current, request))
            }
            OperationKind::Delete => {
                let id = request.require_id()?;
                if !self.store.exists(id).await? {
                    return Err(MutationError::not_found(NOT_FOUND_MESSAGE));
                }
                self.store.delete_by_id(id).await?;
                Ok(Resolved::Done(OperationResult::succeeded(
                    id,
                    OperationKind::Delete,
                    STATUS_OK,
                )))
            }
        }
    }

    async fn is_known(&self, id: &str, pending: &PendingWrites) -> Result<bool, MutationError> {
        if pending.contains(id) {
            return Ok(true);
        }
        Ok(self.store.exists(id).await?)
    }

    /// Latest version of `id`, preferring a write staged earlier in this batch.
    async fn current(
        &self,
        id: &str,
        pending: &PendingWrites,
    ) -> Result<Option<Document>, MutationError> {
        if let Some(staged) = pending.latest(id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.store.get(id).await?)
    }
}

fn staged_create(id: String, request: &MutationRequest) -> Resolved {
    Resolved::Staged {
        operation: OperationKind::Create,
        status: STATUS_CREATED,
        document: Document::create(id, request, Utc::now()),
    }
}

fn staged_update(mut current: Document, request: &MutationRequest) -> Resolved {
    current.merge(request, Utc::now());
    Resolved::Staged {
        operation: OperationKind::Update,
        status: STATUS_OK,
        document: current,
    }
}

/// CREATE never reports the client's id; an id is only assigned on success.
fn failure_id(mutation: &Mutation) -> Option<String> {
    match mutation.kind {
        OperationKind::Create => None,
        _ => mutation.item.declared_id().map(str::to_string),
    }
}
