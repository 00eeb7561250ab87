//! Snapshot store port — whole-registry persistence.

use std::future::Future;

use casita_domain::error::CasitaError;
use casita_domain::registry::Registry;

/// Persistence for the complete [`Registry`] aggregate.
///
/// The registry is small by construction (at most 6 rooms and 60 devices),
/// so persistence is a single document loaded and stored whole rather than
/// per-record operations.
pub trait SnapshotStore {
    /// Load the last persisted registry.
    ///
    /// Returns `Ok(None)` when no snapshot has ever been written, which is
    /// distinct from a snapshot that exists but cannot be read (`Err`).
    fn load(&self) -> impl Future<Output = Result<Option<Registry>, CasitaError>> + Send;

    /// Persist the registry, replacing any previous snapshot atomically
    /// from the caller's point of view.
    fn save(&self, registry: &Registry) -> impl Future<Output = Result<(), CasitaError>> + Send;
}
