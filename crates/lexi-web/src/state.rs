//! Application state.

use std::sync::Arc;

use lexi_core::{LexicalStore, ServiceConfig};

/// Application state shared across handlers.
///
/// Holds no per-request data; every response is built fresh.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LexicalStore>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn LexicalStore>, config: ServiceConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
