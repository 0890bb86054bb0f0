//! Shared application state.

use std::sync::Arc;

use crate::store::SessionStore;

/// Application state handed to every handler. Holding the tables here,
/// rather than in a process global, lets tests run independent server
/// instances side by side.
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
