//! Shared application state for axum handlers.

use std::sync::Arc;

use casita_app::ports::SnapshotStore;
use casita_app::services::RegistryService;

/// Application state shared across all axum handlers.
///
/// Generic over the snapshot store type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the store itself does not need to be
/// `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<S> {
    /// The single registry use-case service.
    pub registry_service: Arc<RegistryService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry_service: Arc::clone(&self.registry_service),
        }
    }
}

impl<S> AppState<S>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    /// Create a new application state from the service instance.
    pub fn new(registry_service: RegistryService<S>) -> Self {
        Self {
            registry_service: Arc::new(registry_service),
        }
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service needs to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arc(registry_service: Arc<RegistryService<S>>) -> Self {
        Self { registry_service }
    }
}
