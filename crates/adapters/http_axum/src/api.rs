//! JSON REST API handlers.

pub mod devices;
pub mod rooms;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use casita_app::ports::SnapshotStore;

use crate::state::AppState;

/// Assemble the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    Router::new()
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route(
            "/rooms/{name}",
            get(rooms::get).put(rooms::rename).delete(rooms::delete),
        )
        .route("/devices", get(devices::list).post(devices::create))
        .route(
            "/devices/{id}",
            get(devices::get)
                .put(devices::update)
                .delete(devices::delete),
        )
        .route("/devices/{id}/actions", post(devices::act))
        .route("/status", get(status::get))
}
