//! # casita-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **`SnapshotStore` port** that persistence adapters implement
//! - Provide the **`RegistryService`** use-case facade: every operation
//!   reloads the latest snapshot, runs the domain mutation, and persists the
//!   result before returning
//! - Seed the initial home layout when no snapshot exists yet
//!
//! ## Dependency rule
//! Depends on `casita-domain` only (plus `tokio::sync` for the registry
//! lock). Never imports adapter crates. Adapters depend on *this* crate, not
//! the reverse.

pub mod ports;
pub mod services;
