use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::DocumentStore;
use super::persistence::StoreSnapshot;
use crate::core::{Document, Result};

/// Document collection held in process memory, ordered by id.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let documents = snapshot
            .documents
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let documents = self.documents.read().await.values().cloned().collect();
        StoreSnapshot::new(documents)
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Document>
    where
        F: Fn(&Document) -> bool,
    {
        self.documents
            .read()
            .await
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.documents.read().await.contains_key(id))
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn batch_write(&self, writes: Vec<(String, Document)>) -> Result<()> {
        let count = writes.len();
        let mut documents = self.documents.write().await;
        for (id, document) in writes {
            documents.insert(id, document);
        }
        debug!(count, "batch write applied");
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn save(&self, document: Document) -> Result<Document> {
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn find_all(&self) -> Result<Vec<Document>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Document>> {
        let needle = name.to_lowercase();
        Ok(self
            .filtered(|doc| {
                doc.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .await)
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Document>> {
        Ok(self
            .filtered(|doc| doc.category.as_deref() == Some(category))
            .await)
    }

    async fn find_active(&self) -> Result<Vec<Document>> {
        Ok(self.filtered(|doc| doc.active).await)
    }

    async fn delete_all(&self) -> Result<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MutationRequest;
    use chrono::Utc;

    fn doc(id: &str, name: &str, category: &str, active: bool) -> Document {
        Document::create(
            id.to_string(),
            &MutationRequest {
                name: Some(name.to_string()),
                category: Some(category.to_string()),
                active: Some(active),
                ..MutationRequest::default()
            },
            Utc::now(),
        )
    }

    async fn seeded() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        store
            .batch_write(vec![
                ("b".to_string(), doc("b", "Gaming Laptop", "electronics", true)),
                ("a".to_string(), doc("a", "Desk Lamp", "home", false)),
                ("c".to_string(), doc("c", "laptop sleeve", "electronics", true)),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn batch_write_then_point_reads() {
        let store = seeded().await;

        assert!(store.exists("a").await.unwrap());
        assert!(!store.exists("zzz").await.unwrap());
        assert_eq!(store.get("b").await.unwrap().unwrap().category.as_deref(), Some("electronics"));
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn later_writes_for_same_id_win_within_a_batch() {
        let store = InMemoryDocumentStore::new();
        store
            .batch_write(vec![
                ("x".to_string(), doc("x", "first", "c", true)),
                ("x".to_string(), doc("x", "second", "c", true)),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("x").await.unwrap().unwrap().name.as_deref(), Some("second"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn queries_filter_and_order_by_id() {
        let store = seeded().await;

        let all: Vec<String> = store.find_all().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let laptops = store.search_by_name("LAPTOP").await.unwrap();
        assert_eq!(laptops.len(), 2);

        let electronics = store.find_by_category("electronics").await.unwrap();
        assert_eq!(electronics.len(), 2);

        let active = store.find_active().await.unwrap();
        assert!(active.iter().all(|d| d.active));
        assert_eq!(active.len(), 2);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let store = seeded().await;

        store.delete_by_id("a").await.unwrap();
        assert!(!store.exists("a").await.unwrap());

        store.delete_all().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn snapshot_round_trip_restores_documents() {
        let store = seeded().await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.metadata.document_count, 3);

        let restored = InMemoryDocumentStore::from_snapshot(snapshot);
        assert_eq!(restored.find_all().await.unwrap(), store.find_all().await.unwrap());
    }
}
