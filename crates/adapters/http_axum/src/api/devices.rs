//! JSON REST handlers for devices, including the actions endpoint.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use casita_app::ports::SnapshotStore;
use casita_domain::device::{Device, OvenPatch, StateInput};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    pub room: Option<String>,
}

/// Request body for creating a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub room: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub initial_state: Option<StateInput>,
}

/// Request body for moving a device and/or replacing its state.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub state: Option<StateInput>,
}

/// Type-specific device commands accepted by the actions endpoint.
///
/// Relative thermostat moves default to one degree when `degrees` is
/// omitted.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeviceAction {
    ToggleLight,
    TurnLightOn,
    TurnLightOff,
    SetThermostat {
        temperature: i64,
    },
    RaiseThermostat {
        #[serde(default = "one_degree")]
        degrees: i64,
    },
    LowerThermostat {
        #[serde(default = "one_degree")]
        degrees: i64,
    },
    SetFanSpeed {
        speed: i64,
    },
    TurnFanOff,
    SetOven {
        #[serde(default)]
        temperature: Option<i64>,
        #[serde(default)]
        timer: Option<i64>,
        #[serde(default)]
        active: Option<bool>,
    },
    TurnOvenOn,
    TurnOvenOff,
    SetOvenTimer {
        minutes: i64,
    },
}

fn one_degree() -> i64 {
    1
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
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
    Ok(Json<Device>),
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
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update and actions endpoints.
pub enum UpdateResponse {
    Ok(Json<Device>),
}

impl IntoResponse for UpdateResponse {
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

/// `GET /api/devices`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let devices = state
        .registry_service
        .list_devices(query.room.as_deref())
        .await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let device = state.registry_service.get_device(&id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<CreateResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let device = state
        .registry_service
        .create_device(&req.room, &req.device_type, req.initial_state)
        .await?;
    Ok(CreateResponse::Created(Json(device)))
}

/// `PUT /api/devices/{id}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<UpdateResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let device = state
        .registry_service
        .update_device(&id, req.room.as_deref(), req.state)
        .await?;
    Ok(UpdateResponse::Ok(Json(device)))
}

/// `DELETE /api/devices/{id}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    state.registry_service.delete_device(&id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/devices/{id}/actions`
pub async fn act<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(action): Json<DeviceAction>,
) -> Result<UpdateResponse, ApiError>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let service = &state.registry_service;
    let device = match action {
        DeviceAction::ToggleLight => service.toggle_light(&id).await?,
        DeviceAction::TurnLightOn => service.set_light(&id, true).await?,
        DeviceAction::TurnLightOff => service.set_light(&id, false).await?,
        DeviceAction::SetThermostat { temperature } => {
            service.set_thermostat(&id, temperature).await?
        }
        DeviceAction::RaiseThermostat { degrees } => {
            service.adjust_thermostat(&id, degrees).await?
        }
        DeviceAction::LowerThermostat { degrees } => {
            service.adjust_thermostat(&id, -degrees).await?
        }
        DeviceAction::SetFanSpeed { speed } => service.set_fan_speed(&id, speed).await?,
        DeviceAction::TurnFanOff => service.set_fan_speed(&id, 0).await?,
        DeviceAction::SetOven {
            temperature,
            timer,
            active,
        } => {
            service
                .set_oven(
                    &id,
                    OvenPatch {
                        temperature,
                        timer,
                        active,
                    },
                )
                .await?
        }
        DeviceAction::TurnOvenOn => {
            service
                .set_oven(
                    &id,
                    OvenPatch {
                        active: Some(true),
                        ..OvenPatch::default()
                    },
                )
                .await?
        }
        DeviceAction::TurnOvenOff => {
            service
                .set_oven(
                    &id,
                    OvenPatch {
                        active: Some(false),
                        ..OvenPatch::default()
                    },
                )
                .await?
        }
        DeviceAction::SetOvenTimer { minutes } => {
            service
                .set_oven(
                    &id,
                    OvenPatch {
                        timer: Some(minutes),
                        ..OvenPatch::default()
                    },
                )
                .await?
        }
    };
    Ok(UpdateResponse::Ok(Json(device)))
}
