//! The registry aggregate — rooms, devices, counters, and every domain rule.
//!
//! All operations are pure in-memory mutations over this aggregate; the
//! reload/persist sequencing around them lives in the `app` crate. Every
//! mutating operation validates fully before touching any state, so a
//! failed call leaves the aggregate exactly as it was.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::device::{
    Device, DeviceState, DeviceType, MAX_TEMP, MIN_TEMP, OvenPatch, StateInput,
};
use crate::error::{
    CapacityError, CasitaError, NotFoundError, PlacementError, WrongTypeError,
};
use crate::room::{Room, RoomKind};

/// Maximum number of rooms in the home.
pub const MAX_ROOMS: usize = 6;
/// Maximum number of devices a single room can hold.
pub const MAX_DEVICES_PER_ROOM: usize = 10;

/// Per-type id sequence counters. Each value is the *next* sequence number;
/// counters only ever grow, so ids are never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub light: u32,
    pub thermo: u32,
    pub fan: u32,
    pub oven: u32,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            light: 1,
            thermo: 1,
            fan: 1,
            oven: 1,
        }
    }
}

impl Counters {
    fn next_id(&mut self, device_type: DeviceType) -> String {
        let counter = match device_type {
            DeviceType::Light => &mut self.light,
            DeviceType::Thermostat => &mut self.thermo,
            DeviceType::Fan => &mut self.fan,
            DeviceType::Oven => &mut self.oven,
        };
        let id = format!("{}-{:02}", device_type.counter_key(), *counter);
        *counter += 1;
        id
    }
}

/// Per-room statistics returned by the room listing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    pub light_count: usize,
    pub thermostat_count: usize,
    pub fan_count: usize,
    pub oven_count: usize,
    pub total_devices: usize,
}

/// Detailed view of one room with its full device records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDetail {
    pub room: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    pub devices: Vec<Device>,
    pub light_count: usize,
    pub thermostat_count: usize,
}

/// The aggregate owning all rooms and devices.
///
/// Serializes to the snapshot document: `{rooms, devices, counters}` with
/// insertion-ordered maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    rooms: IndexMap<String, Room>,
    #[serde(default)]
    devices: IndexMap<String, Device>,
    #[serde(default)]
    counters: Counters,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ----- room operations -------------------------------------------------

    /// Create a room of the given kind with a generated unique name: the
    /// first room of a kind is named after the kind, later ones get a
    /// 1-based suffix (`dormitorio`, `dormitorio 2`, ...).
    ///
    /// # Errors
    ///
    /// [`CasitaError::CapacityExceeded`] at the room ceiling,
    /// [`CasitaError::InvalidKind`] for an unknown kind.
    pub fn add_room(&mut self, kind: &str) -> Result<Room, CasitaError> {
        if self.rooms.len() >= MAX_ROOMS {
            return Err(CapacityError::TooManyRooms { max: MAX_ROOMS }.into());
        }
        let kind = RoomKind::parse(kind)?;
        let occurrences = self.rooms.values().filter(|room| room.kind == kind).count();
        let name = if occurrences == 0 {
            kind.to_string()
        } else {
            format!("{kind} {}", occurrences + 1)
        };
        let room = Room::new(name.clone(), kind);
        self.rooms.insert(name, room.clone());
        Ok(room)
    }

    /// Re-key a room under a new name and update the back-reference of
    /// every device it owns.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when `old` is absent,
    /// [`CasitaError::AlreadyExists`] when `new` names a different room.
    pub fn rename_room(&mut self, old: &str, new: &str) -> Result<Room, CasitaError> {
        if !self.rooms.contains_key(old) {
            return Err(NotFoundError::room(old).into());
        }
        if new != old && self.rooms.contains_key(new) {
            return Err(CasitaError::AlreadyExists(new.to_string()));
        }
        let Some(mut room) = self.rooms.shift_remove(old) else {
            return Err(NotFoundError::room(old).into());
        };
        room.name = new.to_string();
        for device_id in &room.devices {
            if let Some(device) = self.devices.get_mut(device_id) {
                device.room = new.to_string();
            }
        }
        self.rooms.insert(new.to_string(), room.clone());
        Ok(room)
    }

    /// Remove an empty room.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when absent, [`CasitaError::NotEmpty`]
    /// (listing the blocking device ids) when devices are still assigned.
    pub fn delete_room(&mut self, name: &str) -> Result<(), CasitaError> {
        let Some(room) = self.rooms.get(name) else {
            return Err(NotFoundError::room(name).into());
        };
        if !room.devices.is_empty() {
            return Err(CasitaError::NotEmpty {
                room: name.to_string(),
                device_ids: room.devices.clone(),
            });
        }
        self.rooms.shift_remove(name);
        Ok(())
    }

    /// Look up a room by name.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when absent.
    pub fn room(&self, name: &str) -> Result<&Room, CasitaError> {
        self.rooms
            .get(name)
            .ok_or_else(|| NotFoundError::room(name).into())
    }

    /// Every room, with per-type device counts and the total.
    #[must_use]
    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        self.rooms.values().map(|room| self.summarize(room)).collect()
    }

    fn summarize(&self, room: &Room) -> RoomSummary {
        let mut summary = RoomSummary {
            name: room.name.clone(),
            kind: room.kind,
            light_count: 0,
            thermostat_count: 0,
            fan_count: 0,
            oven_count: 0,
            total_devices: room.devices.len(),
        };
        for device_id in &room.devices {
            match self.devices.get(device_id).map(|device| device.device_type) {
                Some(DeviceType::Light) => summary.light_count += 1,
                Some(DeviceType::Thermostat) => summary.thermostat_count += 1,
                Some(DeviceType::Fan) => summary.fan_count += 1,
                Some(DeviceType::Oven) => summary.oven_count += 1,
                None => {}
            }
        }
        summary
    }

    /// One room with its full device records and light/thermostat counts.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when absent.
    pub fn room_detail(&self, name: &str) -> Result<RoomDetail, CasitaError> {
        let room = self.room(name)?;
        let devices: Vec<Device> = room
            .devices
            .iter()
            .filter_map(|device_id| self.devices.get(device_id).cloned())
            .collect();
        let light_count = devices
            .iter()
            .filter(|device| device.device_type == DeviceType::Light)
            .count();
        let thermostat_count = devices
            .iter()
            .filter(|device| device.device_type == DeviceType::Thermostat)
            .count();
        Ok(RoomDetail {
            room: room.name.clone(),
            kind: room.kind,
            devices,
            light_count,
            thermostat_count,
        })
    }

    /// Number of rooms currently registered.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // ----- device operations -----------------------------------------------

    /// Create a device in an existing room, assigning it a fresh id from
    /// the per-type counter. A missing `initial_state` yields the type's
    /// default (light off, thermostat 21 °C, fan 0, oven {180 °C, 0 min,
    /// inactive}).
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] for an absent room,
    /// [`CasitaError::InvalidType`] for an unknown type,
    /// [`CasitaError::RoomRestriction`] for a placement violation,
    /// [`CasitaError::CapacityExceeded`] for a full room,
    /// [`CasitaError::OutOfRange`] / [`CasitaError::WrongType`] for a bad
    /// supplied state.
    pub fn add_device(
        &mut self,
        room_name: &str,
        device_type: &str,
        initial_state: Option<StateInput>,
    ) -> Result<Device, CasitaError> {
        let Some(room) = self.rooms.get(room_name) else {
            return Err(NotFoundError::room(room_name).into());
        };
        let device_type = DeviceType::parse(device_type)?;
        check_placement(device_type, room.kind)?;
        if room.devices.len() >= MAX_DEVICES_PER_ROOM {
            return Err(CapacityError::RoomFull {
                room: room_name.to_string(),
                max: MAX_DEVICES_PER_ROOM,
            }
            .into());
        }
        let state = DeviceState::initial(device_type, initial_state)?;

        let id = self.counters.next_id(device_type);
        let device = Device {
            id: id.clone(),
            device_type,
            room: room_name.to_string(),
            state,
        };
        self.devices.insert(id.clone(), device.clone());
        if let Some(room) = self.rooms.get_mut(room_name) {
            room.devices.push(id);
        }
        Ok(device)
    }

    /// Move a device to another room and/or change its state. Both changes
    /// are optional, independently validated, and applied together only
    /// after all checks pass.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] for an absent device or target room;
    /// [`CasitaError::CapacityExceeded`] / [`CasitaError::RoomRestriction`]
    /// for an invalid move; [`CasitaError::OutOfRange`] /
    /// [`CasitaError::WrongType`] for an invalid state.
    pub fn update_device(
        &mut self,
        id: &str,
        room: Option<&str>,
        state: Option<StateInput>,
    ) -> Result<Device, CasitaError> {
        let Some(device) = self.devices.get(id) else {
            return Err(NotFoundError::device(id).into());
        };
        let device_type = device.device_type;
        let current_room = device.room.clone();
        let current_state = device.state;

        // Validate the move without touching anything.
        let move_to = match room {
            Some(target) if target != current_room => {
                let Some(target_room) = self.rooms.get(target) else {
                    return Err(NotFoundError::room(target).into());
                };
                if target_room.devices.len() >= MAX_DEVICES_PER_ROOM {
                    return Err(CapacityError::RoomFull {
                        room: target.to_string(),
                        max: MAX_DEVICES_PER_ROOM,
                    }
                    .into());
                }
                check_placement(device_type, target_room.kind)?;
                Some(target.to_string())
            }
            _ => None,
        };

        // Build the proposed state up-front; the oven merge in particular
        // must never mutate a device that then fails validation.
        let new_state = match state {
            Some(input) => Some(current_state.apply(input)?),
            None => None,
        };

        if let Some(target) = move_to {
            if let Some(old_room) = self.rooms.get_mut(&current_room) {
                old_room.devices.retain(|device_id| device_id != id);
            }
            if let Some(new_room) = self.rooms.get_mut(&target) {
                new_room.devices.push(id.to_string());
            }
            if let Some(device) = self.devices.get_mut(id) {
                device.room = target;
            }
        }
        if let Some(new_state) = new_state {
            if let Some(device) = self.devices.get_mut(id) {
                device.state = new_state;
            }
        }
        self.device(id).cloned()
    }

    /// Remove a device, detaching it from its room first.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when absent.
    pub fn delete_device(&mut self, id: &str) -> Result<(), CasitaError> {
        let Some(device) = self.devices.get(id) else {
            return Err(NotFoundError::device(id).into());
        };
        let room_name = device.room.clone();
        if let Some(room) = self.rooms.get_mut(&room_name) {
            room.devices.retain(|device_id| device_id != id);
        }
        self.devices.shift_remove(id);
        Ok(())
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when absent.
    pub fn device(&self, id: &str) -> Result<&Device, CasitaError> {
        self.devices
            .get(id)
            .ok_or_else(|| NotFoundError::device(id).into())
    }

    /// All devices, optionally restricted to one room.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`] when the filter names an absent room.
    pub fn list_devices(&self, room_filter: Option<&str>) -> Result<Vec<Device>, CasitaError> {
        if let Some(filter) = room_filter {
            if !self.rooms.contains_key(filter) {
                return Err(NotFoundError::room(filter).into());
            }
            Ok(self
                .devices
                .values()
                .filter(|device| device.room == filter)
                .cloned()
                .collect())
        } else {
            Ok(self.devices.values().cloned().collect())
        }
    }

    /// Number of devices currently registered.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    // ----- type-specific convenience operations ----------------------------
    //
    // All layered on `update_device`; none holds extra state. Each fails
    // with `WrongType` when the target device's type does not match.

    /// Flip a light between on and off.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`].
    pub fn toggle_light(&mut self, id: &str) -> Result<Device, CasitaError> {
        let on = self
            .typed(id, DeviceType::Light)?
            .state
            .as_light()
            .unwrap_or(false);
        self.update_device(id, None, Some(StateInput::Switch(!on)))
    }

    /// Switch a light on or off.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`].
    pub fn set_light(&mut self, id: &str, on: bool) -> Result<Device, CasitaError> {
        self.typed(id, DeviceType::Light)?;
        self.update_device(id, None, Some(StateInput::Switch(on)))
    }

    /// Set a thermostat to an absolute temperature.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`],
    /// [`CasitaError::OutOfRange`].
    pub fn set_thermostat(&mut self, id: &str, temperature: i64) -> Result<Device, CasitaError> {
        self.typed(id, DeviceType::Thermostat)?;
        self.update_device(id, None, Some(StateInput::Level(temperature)))
    }

    /// Raise or lower a thermostat by a relative number of degrees,
    /// clamped to the valid bound instead of failing.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`].
    pub fn adjust_thermostat(&mut self, id: &str, degrees: i64) -> Result<Device, CasitaError> {
        let current = self
            .typed(id, DeviceType::Thermostat)?
            .state
            .as_level()
            .unwrap_or(MIN_TEMP);
        let target = current.saturating_add(degrees).clamp(MIN_TEMP, MAX_TEMP);
        self.update_device(id, None, Some(StateInput::Level(target)))
    }

    /// Set a fan to an absolute speed (0 turns it off).
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`],
    /// [`CasitaError::OutOfRange`].
    pub fn set_fan_speed(&mut self, id: &str, speed: i64) -> Result<Device, CasitaError> {
        self.typed(id, DeviceType::Fan)?;
        self.update_device(id, None, Some(StateInput::Level(speed)))
    }

    /// Apply a partial update to an oven's composite state.
    ///
    /// # Errors
    ///
    /// [`CasitaError::NotFound`], [`CasitaError::WrongType`],
    /// [`CasitaError::OutOfRange`].
    pub fn set_oven(&mut self, id: &str, patch: OvenPatch) -> Result<Device, CasitaError> {
        self.typed(id, DeviceType::Oven)?;
        self.update_device(id, None, Some(StateInput::Oven(patch)))
    }

    fn typed(&self, id: &str, expected: DeviceType) -> Result<&Device, CasitaError> {
        let device = self.device(id)?;
        if device.device_type != expected {
            return Err(WrongTypeError::Operation {
                id: id.to_string(),
                expected,
                actual: device.device_type,
            }
            .into());
        }
        Ok(device)
    }
}

fn check_placement(device_type: DeviceType, room_kind: RoomKind) -> Result<(), PlacementError> {
    if device_type == DeviceType::Oven && room_kind != RoomKind::Kitchen {
        return Err(PlacementError::OvenOutsideKitchen);
    }
    if room_kind == RoomKind::Bathroom && device_type != DeviceType::Light {
        return Err(PlacementError::BathroomAllowsLightsOnly);
    }
    Ok(())
}
