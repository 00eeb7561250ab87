//! Use-case services built on top of the ports.

pub mod registry_service;

pub use registry_service::{RegistryService, StatusReport};
