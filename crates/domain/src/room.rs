//! Room — a named, kinded grouping of devices.

use serde::{Deserialize, Serialize};

use crate::error::CasitaError;

/// The closed set of room categories.
///
/// The serialized identifiers are the snapshot's original Spanish strings;
/// changing them would break round-tripping of existing snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    #[serde(rename = "comedor")]
    Dining,
    #[serde(rename = "cocina")]
    Kitchen,
    #[serde(rename = "baño")]
    Bathroom,
    #[serde(rename = "living")]
    Living,
    #[serde(rename = "dormitorio")]
    Bedroom,
}

impl RoomKind {
    /// All allowed kinds, in the order they are documented.
    pub const ALL: [Self; 5] = [
        Self::Dining,
        Self::Kitchen,
        Self::Bathroom,
        Self::Living,
        Self::Bedroom,
    ];

    /// The serialized identifier, also used to derive room names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dining => "comedor",
            Self::Kitchen => "cocina",
            Self::Bathroom => "baño",
            Self::Living => "living",
            Self::Bedroom => "dormitorio",
        }
    }

    /// Parse a caller-supplied kind string.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::InvalidKind`] for anything outside the set.
    pub fn parse(raw: &str) -> Result<Self, CasitaError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| CasitaError::InvalidKind(raw.to_string()))
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A room holding up to the per-room device ceiling.
///
/// `devices` lists the ids of owned devices in assignment order; each of
/// those devices carries this room's name as its back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    #[serde(default)]
    pub devices: Vec<String>,
}

impl Room {
    /// Create an empty room.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            name: name.into(),
            kind,
            devices: Vec::new(),
        }
    }
}
