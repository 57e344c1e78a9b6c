//! Application state for the web layer.

use std::sync::Arc;

use crate::config::Limits;
use crate::library::LibraryStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The user's library, persisted on every edit
    pub store: Arc<LibraryStore>,

    /// Bounds applied to settings before planning
    pub limits: Limits,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: LibraryStore, limits: Limits) -> Self {
        Self {
            store: Arc::new(store),
            limits,
        }
    }
}
