//! # casita-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST JSON API** for the registry
//!   (`/api/rooms`, `/api/devices`, `/api/status`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and domain errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `casita-app` (for the port trait and service) and
//! `casita-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
