pub mod memory;
pub mod persistence;

use async_trait::async_trait;

use crate::core::{Document, Result};

pub use memory::InMemoryDocumentStore;
pub use persistence::{SnapshotManager, StoreSnapshot};

/// Client for the document collection.
///
/// Implementations are shared across requests behind an `Arc` and must be
/// safe to call concurrently. The bulk path only uses `exists`, `get`,
/// `batch_write` and `delete_by_id`; the rest back the passthrough endpoints.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn exists(&self, id: &str) -> Result<bool>;

    async fn get(&self, id: &str) -> Result<Option<Document>>;

    /// Writes every `(id, document)` pair in one call. Either the whole call
    /// succeeds or it reports a single error for all of them.
    async fn batch_write(&self, writes: Vec<(String, Document)>) -> Result<()>;

    async fn delete_by_id(&self, id: &str) -> Result<()>;

    async fn save(&self, document: Document) -> Result<Document>;

    async fn find_all(&self) -> Result<Vec<Document>>;

    /// Case-insensitive substring match on the document name.
    async fn search_by_name(&self, name: &str) -> Result<Vec<Document>>;

    async fn find_by_category(&self, category: &str) -> Result<Vec<Document>>;

    async fn find_active(&self) -> Result<Vec<Document>>;

    async fn delete_all(&self) -> Result<()>;

    async fn count(&self) -> Result<usize>;
}
