use std::sync::Arc;

use crate::bulk::BulkCoordinator;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub coordinator: BulkCoordinator,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let coordinator = BulkCoordinator::new(Arc::clone(&store));
        Self { store, coordinator }
    }
}
