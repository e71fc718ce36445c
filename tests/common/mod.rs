#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use docbulk::{Document, DocumentStore, InMemoryDocumentStore, MutationRequest, Result, StoreError};

/// In-memory store whose write paths can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    fail_batch: AtomicBool,
    fail_delete: AtomicBool,
    fail_reads: AtomicBool,
    batch_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_batch_writes(&self, fail: bool) {
        self.fail_batch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read timed out".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn exists(&self, id: &str) -> Result<bool> {
        self.check_reads()?;
        self.inner.exists(id).await
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        self.check_reads()?;
        self.inner.get(id).await
    }

    async fn batch_write(&self, writes: Vec<(String, Document)>) -> Result<()> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_batch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("cluster unreachable".to_string()));
        }
        self.inner.batch_write(writes).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("delete refused".to_string()));
        }
        self.inner.delete_by_id(id).await
    }

    async fn save(&self, document: Document) -> Result<Document> {
        self.inner.save(document).await
    }

    async fn find_all(&self) -> Result<Vec<Document>> {
        self.inner.find_all().await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Document>> {
        self.inner.search_by_name(name).await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Document>> {
        self.inner.find_by_category(category).await
    }

    async fn find_active(&self) -> Result<Vec<Document>> {
        self.inner.find_active().await
    }

    async fn delete_all(&self) -> Result<()> {
        self.inner.delete_all().await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

pub fn product(name: &str) -> MutationRequest {
    MutationRequest {
        name: Some(name.to_string()),
        category: Some("electronics".to_string()),
        price: Some(10.0),
        stock: Some(5),
        ..MutationRequest::default()
    }
}

pub fn with_id(id: &str, request: MutationRequest) -> MutationRequest {
    MutationRequest {
        id: Some(id.to_string()),
        ..request
    }
}

pub async fn seed(store: &dyn DocumentStore, id: &str, request: MutationRequest) -> Document {
    store
        .save(Document::create(id.to_string(), &request, Utc::now()))
        .await
        .expect("seeding should succeed")
}
