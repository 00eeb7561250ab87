//! JSON REST handlers for rooms.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use casita_app::ports::SnapshotStore;
use casita_domain::registry::{RoomDetail, RoomSummary};
use casita_domain::room::Room;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a room.
#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub kind: String,
}

/// Request body for renaming a room.
#[derive(Deserialize)]
pub struct RenameRoomRequest {
    pub new_name: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<RoomSummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<RoomDetail>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Room>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the rename endpoint.
pub enum RenameResponse {
    Ok(Json<Room>),
}

impl IntoResponse for RenameResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/rooms`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<ListResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let rooms = state.registry_service.list_rooms().await?;
    Ok(ListResponse::Ok(Json(rooms)))
}

/// `GET /api/rooms/{name}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let detail = state.registry_service.get_room(&name).await?;
    Ok(GetResponse::Ok(Json(detail)))
}

/// `POST /api/rooms`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<CreateResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let room = state.registry_service.create_room(&req.kind).await?;
    Ok(CreateResponse::Created(Json(room)))
}

/// `PUT /api/rooms/{name}`
pub async fn rename<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    Json(req): Json<RenameRoomRequest>,
) -> Result<RenameResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let room = state
        .registry_service
        .rename_room(&name, &req.new_name)
        .await?;
    Ok(RenameResponse::Ok(Json(room)))
}

/// `DELETE /api/rooms/{name}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    state.registry_service.delete_room(&name).await?;
    Ok(DeleteResponse::NoContent)
}
