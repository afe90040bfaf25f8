//! Shared application state for Axum routers.

use std::sync::Arc;

use ramen_storage::TodoStore;

/// Application-wide state shared across all routes.
///
/// Handlers only see the store capability trait, so routers can be built
/// over the PostgreSQL gateway in production and over `MockStore` in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}
