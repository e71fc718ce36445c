// ============================================================================
// docbulk Library
// ============================================================================

pub mod bulk;
pub mod config;
pub mod core;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use bulk::{
    BatchResponse, BulkCoordinator, Mutation, MutationItem, OperationKind, OperationResult,
};
pub use config::AppConfig;
pub use crate::core::{Document, MutationError, MutationRequest, Result, StoreError};
pub use storage::{DocumentStore, InMemoryDocumentStore, SnapshotManager, StoreSnapshot};
pub use web::{AppState, WebError, build_router};
