//! # casita-adapter-storage-json
//!
//! JSON file persistence adapter.
//!
//! ## Responsibilities
//! - Implement the `SnapshotStore` port defined in `casita-app::ports`
//! - Serialize the whole registry to one pretty-printed JSON document
//! - Treat a missing snapshot file as "never persisted", not as an error
//!
//! ## Dependency rule
//! Depends on `casita-app` (for the port trait) and `casita-domain` (for the
//! registry type). The `app` and `domain` crates must never reference this
//! adapter.

pub mod error;
pub mod store;

pub use error::StorageError;
pub use store::JsonSnapshotStore;
