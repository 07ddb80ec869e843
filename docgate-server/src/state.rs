//! Shared per-process state handed to every request handler.

use std::sync::Arc;

use docgate_core::backend::DocumentBackend;
use docgate_core::cache::CacheBackend;
use docgate_core::executor::CrudExecutor;
use docgate_core::schema::SchemaRegistry;

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<SchemaRegistry>,
    pub executor: CrudExecutor,
    pub cache: Arc<dyn CacheBackend>,
}

impl AppState {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        store: Arc<dyn DocumentBackend>,
        cache: Arc<dyn CacheBackend>,
    ) -> Self {
        Self {
            registry,
            executor: CrudExecutor::new(store),
            cache,
        }
    }
}
