//! Server state management.

use std::sync::Arc;

use revoir_core::{CardStore, RevoirResult, SrsConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CardStore>,
    /// Default cap on cards per review-queue request.
    pub due_limit: usize,
}

impl AppState {
    /// Create application state from configuration, opening the store.
    pub fn new(config: &SrsConfig) -> RevoirResult<Self> {
        Ok(Self {
            store: Arc::new(CardStore::open(config)?),
            due_limit: config.due_limit,
        })
    }

    /// Create state backed by an in-memory store (useful for testing).
    pub fn in_memory() -> RevoirResult<Self> {
        Ok(Self {
            store: Arc::new(CardStore::in_memory()?),
            due_limit: SrsConfig::default().due_limit,
        })
    }
}
