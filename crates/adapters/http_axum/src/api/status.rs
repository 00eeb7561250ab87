//! Whole-home status handler.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use casita_app::ports::SnapshotStore;
use casita_app::services::StatusReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the status endpoint.
pub enum GetResponse {
    Ok(Json<StatusReport>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/status`
pub async fn get<S>(State(state): State<AppState<S>>) -> Result<GetResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let status = state.registry_service.status().await?;
    Ok(GetResponse::Ok(Json(status)))
}
