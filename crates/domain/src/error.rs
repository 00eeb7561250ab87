//! Domain error taxonomy.
//!
//! Every registry operation fails with one of these kinds so that callers
//! can branch on the variant instead of parsing message text. Messages stay
//! human-readable because the HTTP layer surfaces them verbatim.

use crate::device::DeviceType;

/// Top-level error for every registry operation.
#[derive(Debug, thiserror::Error)]
pub enum CasitaError {
    /// A referenced room or device does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A rename target collides with an existing room name.
    #[error("room '{0}' already exists")]
    AlreadyExists(String),

    /// Room deletion blocked by devices still assigned to it.
    #[error("room '{room}' still holds devices, remove them first: {}", device_ids.join(", "))]
    NotEmpty {
        room: String,
        device_ids: Vec<String>,
    },

    /// Supplied room kind is outside the fixed set.
    #[error("unknown room kind '{0}', allowed kinds: comedor, cocina, baño, living, dormitorio")]
    InvalidKind(String),

    /// Supplied device type is outside the fixed set.
    #[error("unknown device type '{0}', allowed types: light, thermostat, fan, oven")]
    InvalidType(String),

    /// Oven-outside-kitchen or non-light-in-bathroom placement violation.
    #[error(transparent)]
    RoomRestriction(#[from] PlacementError),

    /// Room-count or devices-per-room ceiling reached.
    #[error(transparent)]
    CapacityExceeded(#[from] CapacityError),

    /// Numeric state value outside its type's valid bound.
    #[error(transparent)]
    OutOfRange(#[from] RangeError),

    /// Operation or state value applied to a device of the wrong type.
    #[error(transparent)]
    WrongType(#[from] WrongTypeError),

    /// Failure in the persistence adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A referenced entity does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    /// Which kind of entity was looked up (`room` or `device`).
    pub entity: &'static str,
    /// The key that failed to resolve.
    pub id: String,
}

impl NotFoundError {
    pub fn room(name: impl Into<String>) -> Self {
        Self {
            entity: "room",
            id: name.into(),
        }
    }

    pub fn device(id: impl Into<String>) -> Self {
        Self {
            entity: "device",
            id: id.into(),
        }
    }
}

/// Placement rules tied to the room kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("ovens can only be placed in a kitchen")]
    OvenOutsideKitchen,
    #[error("only lights are allowed in a bathroom")]
    BathroomAllowsLightsOnly,
}

/// Fixed system ceilings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("the home is limited to {max} rooms")]
    TooManyRooms { max: usize },
    #[error("room '{room}' already holds the maximum of {max} devices")]
    RoomFull { room: String, max: usize },
}

/// A numeric state value outside its valid bound.
///
/// Carries the attempted value and both ends of the bound so the message
/// can be surfaced to an end user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{quantity} {value} out of range ({min}-{max})")]
pub struct RangeError {
    pub quantity: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Type mismatches between a device and what was asked of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WrongTypeError {
    /// A type-specific operation was invoked against another device type.
    #[error("device '{id}' is a {actual}, not a {expected}")]
    Operation {
        id: String,
        expected: DeviceType,
        actual: DeviceType,
    },
    /// A supplied state value cannot fit the device's type at all.
    #[error("state value does not fit a {device_type} device")]
    StateShape { device_type: DeviceType },
}
