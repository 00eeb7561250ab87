//! Device — typed device model and per-type state validation.
//!
//! A device's `state` is a tagged union keyed by its type. In the snapshot
//! the tag is carried by the sibling `type` field, so `state` serializes as
//! a bare boolean, a bare integer, or the oven's composite object; the
//! custom serde bridge below keeps that wire shape.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{CasitaError, RangeError, WrongTypeError};

/// Thermostat bounds, in °C.
pub const MIN_TEMP: i64 = 16;
pub const MAX_TEMP: i64 = 32;
pub const DEFAULT_TEMP: i64 = 21;

/// Fan speeds: 0 is off, 1-5 are running speeds.
pub const MIN_FAN_SPEED: i64 = 0;
pub const MAX_FAN_SPEED: i64 = 5;

/// Oven bounds: temperature in °C, timer in minutes.
pub const MIN_OVEN_TEMP: i64 = 160;
pub const MAX_OVEN_TEMP: i64 = 240;
pub const DEFAULT_OVEN_TEMP: i64 = 180;
pub const MAX_OVEN_TIMER: i64 = 240;

/// The closed set of device types. Immutable once a device is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Light,
    Thermostat,
    Fan,
    Oven,
}

impl DeviceType {
    /// All device types, in the order they are documented.
    pub const ALL: [Self; 4] = [Self::Light, Self::Thermostat, Self::Fan, Self::Oven];

    /// The id prefix and counter key for this type (`thermo`, not
    /// `thermostat`, for historical snapshot compatibility).
    #[must_use]
    pub fn counter_key(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermo",
            Self::Fan => "fan",
            Self::Oven => "oven",
        }
    }

    /// Parse a caller-supplied type string.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::InvalidType`] for anything outside the set.
    pub fn parse(raw: &str) -> Result<Self, CasitaError> {
        match raw {
            "light" => Ok(Self::Light),
            "thermostat" => Ok(Self::Thermostat),
            "fan" => Ok(Self::Fan),
            "oven" => Ok(Self::Oven),
            other => Err(CasitaError::InvalidType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
            Self::Fan => "fan",
            Self::Oven => "oven",
        };
        f.write_str(name)
    }
}

/// Validate a thermostat temperature.
///
/// # Errors
///
/// Returns [`RangeError`] when outside [[`MIN_TEMP`], [`MAX_TEMP`]].
pub fn validate_temperature(value: i64) -> Result<(), RangeError> {
    check_range("temperature", value, MIN_TEMP, MAX_TEMP)
}

/// Validate a fan speed.
///
/// # Errors
///
/// Returns [`RangeError`] when outside [[`MIN_FAN_SPEED`], [`MAX_FAN_SPEED`]].
pub fn validate_fan_speed(value: i64) -> Result<(), RangeError> {
    check_range("fan speed", value, MIN_FAN_SPEED, MAX_FAN_SPEED)
}

/// Validate an oven temperature.
///
/// # Errors
///
/// Returns [`RangeError`] when outside [[`MIN_OVEN_TEMP`], [`MAX_OVEN_TEMP`]].
pub fn validate_oven_temperature(value: i64) -> Result<(), RangeError> {
    check_range("oven temperature", value, MIN_OVEN_TEMP, MAX_OVEN_TEMP)
}

/// Validate an oven timer.
///
/// # Errors
///
/// Returns [`RangeError`] when outside [0, [`MAX_OVEN_TIMER`]].
pub fn validate_oven_timer(value: i64) -> Result<(), RangeError> {
    check_range("oven timer", value, 0, MAX_OVEN_TIMER)
}

fn check_range(quantity: &'static str, value: i64, min: i64, max: i64) -> Result<(), RangeError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RangeError {
            quantity,
            value,
            min,
            max,
        })
    }
}

/// Composite state of an oven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvenState {
    pub temperature: i64,
    pub timer: i64,
    pub active: bool,
}

impl Default for OvenState {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_OVEN_TEMP,
            timer: 0,
            active: false,
        }
    }
}

impl OvenState {
    /// Check both numeric sub-fields against their bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] for the first sub-field outside its bound.
    pub fn validate(&self) -> Result<(), RangeError> {
        validate_oven_temperature(self.temperature)?;
        validate_oven_timer(self.timer)
    }

    /// The state that would result from applying `patch`; absent fields
    /// keep their current value. Pure, not yet validated.
    #[must_use]
    pub fn merged(self, patch: OvenPatch) -> Self {
        Self {
            temperature: patch.temperature.unwrap_or(self.temperature),
            timer: patch.timer.unwrap_or(self.timer),
            active: patch.active.unwrap_or(self.active),
        }
    }
}

/// Partial update for an oven's composite state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvenPatch {
    #[serde(default)]
    pub temperature: Option<i64>,
    #[serde(default)]
    pub timer: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Caller-supplied state for create/update, before it has been checked
/// against the target device's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateInput {
    Switch(bool),
    Level(i64),
    Oven(OvenPatch),
}

/// Type-dependent device state. Always shape- and range-valid for the
/// owning device's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeviceState {
    Light(bool),
    Thermostat(i64),
    Fan(i64),
    Oven(OvenState),
}

impl DeviceState {
    /// Default state for a freshly created device of `device_type`.
    #[must_use]
    pub fn default_for(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Light => Self::Light(false),
            DeviceType::Thermostat => Self::Thermostat(DEFAULT_TEMP),
            DeviceType::Fan => Self::Fan(MIN_FAN_SPEED),
            DeviceType::Oven => Self::Oven(OvenState::default()),
        }
    }

    /// Build and validate the initial state of a new device.
    ///
    /// A missing input yields the type's default. An oven input is applied
    /// as a patch over the default composite state.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::OutOfRange`] for numeric violations and
    /// [`CasitaError::WrongType`] when the input cannot fit the type.
    pub fn initial(
        device_type: DeviceType,
        input: Option<StateInput>,
    ) -> Result<Self, CasitaError> {
        match input {
            None => Ok(Self::default_for(device_type)),
            Some(input) => Self::default_for(device_type).apply(input),
        }
    }

    /// The state that would result from applying `input` to `self`.
    ///
    /// Validates the full proposed state before anything is mutated, so a
    /// rejected update leaves the device untouched. An integer sets a
    /// light to its truthiness; no other cross-shape coercion exists.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::OutOfRange`] for numeric violations and
    /// [`CasitaError::WrongType`] when the input cannot fit the type.
    pub fn apply(self, input: StateInput) -> Result<Self, CasitaError> {
        match (self, input) {
            (Self::Light(_), StateInput::Switch(on)) => Ok(Self::Light(on)),
            (Self::Light(_), StateInput::Level(level)) => Ok(Self::Light(level != 0)),
            (Self::Thermostat(_), StateInput::Level(temperature)) => {
                validate_temperature(temperature)?;
                Ok(Self::Thermostat(temperature))
            }
            (Self::Fan(_), StateInput::Level(speed)) => {
                validate_fan_speed(speed)?;
                Ok(Self::Fan(speed))
            }
            (Self::Oven(current), StateInput::Oven(patch)) => {
                let proposed = current.merged(patch);
                proposed.validate()?;
                Ok(Self::Oven(proposed))
            }
            (state, _) => Err(WrongTypeError::StateShape {
                device_type: state.device_type(),
            }
            .into()),
        }
    }

    /// The device type this state belongs to.
    #[must_use]
    pub fn device_type(self) -> DeviceType {
        match self {
            Self::Light(_) => DeviceType::Light,
            Self::Thermostat(_) => DeviceType::Thermostat,
            Self::Fan(_) => DeviceType::Fan,
            Self::Oven(_) => DeviceType::Oven,
        }
    }

    /// The on/off flag, if this is a light state.
    #[must_use]
    pub fn as_light(self) -> Option<bool> {
        match self {
            Self::Light(on) => Some(on),
            _ => None,
        }
    }

    /// The integer level, if this is a thermostat or fan state.
    #[must_use]
    pub fn as_level(self) -> Option<i64> {
        match self {
            Self::Thermostat(level) | Self::Fan(level) => Some(level),
            _ => None,
        }
    }

    /// The composite record, if this is an oven state.
    #[must_use]
    pub fn as_oven(self) -> Option<OvenState> {
        match self {
            Self::Oven(oven) => Some(oven),
            _ => None,
        }
    }

    fn from_snapshot(device_type: DeviceType, value: &Value) -> Result<Self, CasitaError> {
        let shape_error = || {
            CasitaError::from(WrongTypeError::StateShape { device_type })
        };
        match device_type {
            DeviceType::Light => value.as_bool().map(Self::Light).ok_or_else(shape_error),
            DeviceType::Thermostat => value
                .as_i64()
                .map(Self::Thermostat)
                .ok_or_else(shape_error),
            DeviceType::Fan => value.as_i64().map(Self::Fan).ok_or_else(shape_error),
            DeviceType::Oven => serde_json::from_value(value.clone())
                .map(Self::Oven)
                .map_err(|_| shape_error()),
        }
    }

    fn to_snapshot(self) -> Value {
        match self {
            Self::Light(on) => Value::Bool(on),
            Self::Thermostat(level) | Self::Fan(level) => Value::from(level),
            Self::Oven(oven) => json!({
                "temperature": oven.temperature,
                "timer": oven.timer,
                "active": oven.active,
            }),
        }
    }
}

/// A device assigned to exactly one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDevice", into = "RawDevice")]
pub struct Device {
    pub id: String,
    pub device_type: DeviceType,
    pub room: String,
    pub state: DeviceState,
}

/// Wire form of a [`Device`]: the `state` shape depends on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDevice {
    id: String,
    #[serde(rename = "type")]
    device_type: DeviceType,
    room: String,
    state: Value,
}

impl From<Device> for RawDevice {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            device_type: device.device_type,
            room: device.room,
            state: device.state.to_snapshot(),
        }
    }
}

impl TryFrom<RawDevice> for Device {
    type Error = CasitaError;

    fn try_from(raw: RawDevice) -> Result<Self, Self::Error> {
        let state = DeviceState::from_snapshot(raw.device_type, &raw.state)?;
        Ok(Self {
            id: raw.id,
            device_type: raw.device_type,
            room: raw.room,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_provide_documented_defaults_per_type() {
        assert_eq!(
            DeviceState::default_for(DeviceType::Light),
            DeviceState::Light(false)
        );
        assert_eq!(
            DeviceState::default_for(DeviceType::Thermostat),
            DeviceState::Thermostat(21)
        );
        assert_eq!(DeviceState::default_for(DeviceType::Fan), DeviceState::Fan(0));
        assert_eq!(
            DeviceState::default_for(DeviceType::Oven),
            DeviceState::Oven(OvenState {
                temperature: 180,
                timer: 0,
                active: false,
            })
        );
    }

    #[test]
    fn should_reject_unknown_device_type() {
        let result = DeviceType::parse("dishwasher");
        assert!(matches!(result, Err(CasitaError::InvalidType(raw)) if raw == "dishwasher"));
    }

    #[test]
    fn should_use_thermo_counter_key_for_thermostats() {
        assert_eq!(DeviceType::Thermostat.counter_key(), "thermo");
        assert_eq!(DeviceType::Light.counter_key(), "light");
    }

    #[test]
    fn should_coerce_integer_to_light_truthiness() {
        let state = DeviceState::Light(false)
            .apply(StateInput::Level(5))
            .unwrap();
        assert_eq!(state, DeviceState::Light(true));

        let state = DeviceState::Light(true)
            .apply(StateInput::Level(0))
            .unwrap();
        assert_eq!(state, DeviceState::Light(false));
    }

    #[test]
    fn should_reject_thermostat_outside_bounds() {
        let result = DeviceState::Thermostat(21).apply(StateInput::Level(33));
        assert!(matches!(
            result,
            Err(CasitaError::OutOfRange(RangeError {
                quantity: "temperature",
                value: 33,
                min: 16,
                max: 32,
            }))
        ));
    }

    #[test]
    fn should_reject_fan_speed_outside_bounds() {
        let result = DeviceState::Fan(0).apply(StateInput::Level(7));
        assert!(matches!(
            result,
            Err(CasitaError::OutOfRange(RangeError { value: 7, .. }))
        ));
    }

    #[test]
    fn should_merge_oven_patch_and_retain_absent_fields() {
        let current = DeviceState::Oven(OvenState {
            temperature: 200,
            timer: 30,
            active: true,
        });
        let state = current
            .apply(StateInput::Oven(OvenPatch {
                timer: Some(45),
                ..OvenPatch::default()
            }))
            .unwrap();
        assert_eq!(
            state,
            DeviceState::Oven(OvenState {
                temperature: 200,
                timer: 45,
                active: true,
            })
        );
    }

    #[test]
    fn should_reject_oven_merge_when_new_subfield_invalid() {
        let current = DeviceState::Oven(OvenState::default());
        let result = current.apply(StateInput::Oven(OvenPatch {
            temperature: Some(250),
            ..OvenPatch::default()
        }));
        assert!(matches!(
            result,
            Err(CasitaError::OutOfRange(RangeError {
                quantity: "oven temperature",
                value: 250,
                ..
            }))
        ));
    }

    #[test]
    fn should_reject_state_shape_mismatch_with_wrong_type() {
        let result = DeviceState::Thermostat(21).apply(StateInput::Switch(true));
        assert!(matches!(
            result,
            Err(CasitaError::WrongType(WrongTypeError::StateShape {
                device_type: DeviceType::Thermostat,
            }))
        ));

        let result = DeviceState::Fan(0).apply(StateInput::Oven(OvenPatch::default()));
        assert!(matches!(result, Err(CasitaError::WrongType(_))));
    }

    #[test]
    fn should_build_initial_oven_state_from_patch_over_defaults() {
        let state = DeviceState::initial(
            DeviceType::Oven,
            Some(StateInput::Oven(OvenPatch {
                active: Some(true),
                ..OvenPatch::default()
            })),
        )
        .unwrap();
        assert_eq!(
            state.as_oven().unwrap(),
            OvenState {
                temperature: 180,
                timer: 0,
                active: true,
            }
        );
    }

    #[test]
    fn should_serialize_device_state_as_bare_value() {
        let device = Device {
            id: "light-01".to_string(),
            device_type: DeviceType::Light,
            room: "living".to_string(),
            state: DeviceState::Light(true),
        };
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["id"], "light-01");
        assert_eq!(json["type"], "light");
        assert_eq!(json["room"], "living");
        assert_eq!(json["state"], true);
    }

    #[test]
    fn should_deserialize_state_by_sibling_type_field() {
        let thermostat: Device = serde_json::from_str(
            r#"{"id":"thermo-01","type":"thermostat","room":"living","state":22}"#,
        )
        .unwrap();
        assert_eq!(thermostat.state, DeviceState::Thermostat(22));

        let fan: Device =
            serde_json::from_str(r#"{"id":"fan-01","type":"fan","room":"living","state":3}"#)
                .unwrap();
        assert_eq!(fan.state, DeviceState::Fan(3));

        let oven: Device = serde_json::from_str(
            r#"{"id":"oven-01","type":"oven","room":"cocina","state":{"temperature":200,"timer":15,"active":true}}"#,
        )
        .unwrap();
        assert_eq!(
            oven.state,
            DeviceState::Oven(OvenState {
                temperature: 200,
                timer: 15,
                active: true,
            })
        );
    }

    #[test]
    fn should_fail_deserialization_when_state_shape_mismatches_type() {
        let result: Result<Device, _> = serde_json::from_str(
            r#"{"id":"light-01","type":"light","room":"living","state":22}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn should_roundtrip_every_device_shape() {
        for device_type in DeviceType::ALL {
            let device = Device {
                id: format!("{}-01", device_type.counter_key()),
                device_type,
                room: "cocina".to_string(),
                state: DeviceState::default_for(device_type),
            };
            let json = serde_json::to_string(&device).unwrap();
            let parsed: Device = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, device);
        }
    }
}
