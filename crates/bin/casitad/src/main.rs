//! # casitad — casita daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Construct the JSON snapshot store (adapter)
//! - Construct the registry service, injecting the store via the port trait
//! - Seed the initial home layout when starting with no snapshot
//! - Build the axum router, injecting the application service
//! - Bind to a TCP port and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use casita_adapter_http_axum::state::AppState;
use casita_adapter_storage_json::JsonSnapshotStore;
use casita_app::services::RegistryService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let store = JsonSnapshotStore::new(config.snapshot_path());
    let registry_service = RegistryService::new(store);
    registry_service.ensure_seeded().await?;

    let state = AppState::new(registry_service);
    let app = casita_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, snapshot = config.snapshot_path(), "casitad listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
