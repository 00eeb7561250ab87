//! Registry service — use-cases for managing rooms and devices.
//!
//! Every operation follows the same shape: reload the latest snapshot,
//! apply the domain operation, persist, return. Reloading first means
//! several processes can share one snapshot file; the last writer wins.

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use casita_domain::device::{Device, OvenPatch, StateInput};
use casita_domain::error::CasitaError;
use casita_domain::registry::{Registry, RoomDetail, RoomSummary};
use casita_domain::room::{Room, RoomKind};

use crate::ports::SnapshotStore;

/// Whole-home overview returned by the status use-case.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub rooms: Vec<RoomSummary>,
    pub devices: Vec<Device>,
    pub total_rooms: usize,
    pub total_devices: usize,
}

/// Application service for registry operations, backed by a snapshot store.
pub struct RegistryService<S> {
    store: S,
    registry: Mutex<Registry>,
}

impl<S: SnapshotStore> RegistryService<S> {
    /// Create a new service backed by the given snapshot store.
    ///
    /// The in-memory registry starts empty; call [`Self::ensure_seeded`]
    /// once at startup to load the snapshot or create the initial layout.
    pub fn new(store: S) -> Self {
        Self {
            store,
            registry: Mutex::new(Registry::new()),
        }
    }

    /// Load the persisted snapshot, or seed and persist the initial home
    /// layout (a living room with an off light and a 21 °C thermostat)
    /// when none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::Storage`] when the snapshot cannot be read
    /// or the seed cannot be written.
    pub async fn ensure_seeded(&self) -> Result<(), CasitaError> {
        let mut current = self.registry.lock().await;
        if let Some(registry) = self.store.load().await? {
            *current = registry;
            return Ok(());
        }
        let mut registry = Registry::new();
        let room = registry.add_room(RoomKind::Living.as_str())?;
        registry.add_device(&room.name, "light", Some(StateInput::Switch(false)))?;
        registry.add_device(&room.name, "thermostat", Some(StateInput::Level(21)))?;
        self.store.save(&registry).await?;
        tracing::info!(room = %room.name, "seeded initial registry");
        *current = registry;
        Ok(())
    }

    /// Reload the snapshot into the in-memory registry and hand back the
    /// lock. A failed reload keeps the last good in-memory state.
    async fn refreshed(&self) -> MutexGuard<'_, Registry> {
        let mut current = self.registry.lock().await;
        match self.store.load().await {
            Ok(Some(registry)) => *current = registry,
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, "snapshot reload failed, keeping in-memory registry");
            }
        }
        current
    }

    // ----- room use-cases --------------------------------------------------

    /// Create a room of the given kind.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn create_room(&self, kind: &str) -> Result<Room, CasitaError> {
        let mut registry = self.refreshed().await;
        let room = registry.add_room(kind)?;
        self.store.save(&registry).await?;
        Ok(room)
    }

    /// List every room with its per-type device counts.
    ///
    /// # Errors
    ///
    /// Never fails on domain grounds; present for uniformity with the
    /// other use-cases should the reload path gain hard failures.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, CasitaError> {
        let registry = self.refreshed().await;
        Ok(registry.room_summaries())
    }

    /// Fetch one room with its full device records.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::NotFound`] when the room does not exist.
    pub async fn get_room(&self, name: &str) -> Result<RoomDetail, CasitaError> {
        let registry = self.refreshed().await;
        registry.room_detail(name)
    }

    /// Rename a room, updating every owned device's back-reference.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn rename_room(&self, old: &str, new: &str) -> Result<Room, CasitaError> {
        let mut registry = self.refreshed().await;
        let room = registry.rename_room(old, new)?;
        self.store.save(&registry).await?;
        Ok(room)
    }

    /// Delete an empty room.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::NotEmpty`] when devices remain, plus the
    /// usual not-found and storage errors.
    pub async fn delete_room(&self, name: &str) -> Result<(), CasitaError> {
        let mut registry = self.refreshed().await;
        registry.delete_room(name)?;
        self.store.save(&registry).await?;
        Ok(())
    }

    // ----- device use-cases ------------------------------------------------

    /// Create a device in a room, optionally with an explicit initial state.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn create_device(
        &self,
        room: &str,
        device_type: &str,
        initial_state: Option<StateInput>,
    ) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.add_device(room, device_type, initial_state)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// List devices, optionally restricted to one room.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::NotFound`] when the filter names an absent
    /// room.
    pub async fn list_devices(&self, room: Option<&str>) -> Result<Vec<Device>, CasitaError> {
        let registry = self.refreshed().await;
        registry.list_devices(room)
    }

    /// Fetch one device by id.
    ///
    /// # Errors
    ///
    /// Returns [`CasitaError::NotFound`] when the device does not exist.
    pub async fn get_device(&self, id: &str) -> Result<Device, CasitaError> {
        let registry = self.refreshed().await;
        registry.device(id).cloned()
    }

    /// Move a device and/or replace its state.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn update_device(
        &self,
        id: &str,
        room: Option<&str>,
        state: Option<StateInput>,
    ) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.update_device(id, room, state)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Delete a device, detaching it from its room.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn delete_device(&self, id: &str) -> Result<(), CasitaError> {
        let mut registry = self.refreshed().await;
        registry.delete_device(id)?;
        self.store.save(&registry).await?;
        Ok(())
    }

    /// Whole-home overview: every room summary plus every device record.
    ///
    /// # Errors
    ///
    /// Never fails on domain grounds; see [`Self::list_rooms`].
    pub async fn status(&self) -> Result<StatusReport, CasitaError> {
        let registry = self.refreshed().await;
        let rooms = registry.room_summaries();
        let devices = registry.list_devices(None)?;
        Ok(StatusReport {
            total_rooms: rooms.len(),
            total_devices: devices.len(),
            rooms,
            devices,
        })
    }

    // ----- type-specific device use-cases ----------------------------------

    /// Flip a light between on and off.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn toggle_light(&self, id: &str) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.toggle_light(id)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Switch a light on or off.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn set_light(&self, id: &str, on: bool) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.set_light(id, on)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Set a thermostat to an absolute temperature.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn set_thermostat(&self, id: &str, temperature: i64) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.set_thermostat(id, temperature)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Raise or lower a thermostat, clamped to its valid bound.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn adjust_thermostat(&self, id: &str, degrees: i64) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.adjust_thermostat(id, degrees)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Set a fan to an absolute speed (0 turns it off).
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn set_fan_speed(&self, id: &str, speed: i64) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.set_fan_speed(id, speed)?;
        self.store.save(&registry).await?;
        Ok(device)
    }

    /// Apply a partial update to an oven's composite state.
    ///
    /// # Errors
    ///
    /// Propagates domain validation errors and storage errors.
    pub async fn set_oven(&self, id: &str, patch: OvenPatch) -> Result<Device, CasitaError> {
        let mut registry = self.refreshed().await;
        let device = registry.set_oven(id, patch)?;
        self.store.save(&registry).await?;
        Ok(device)
    }
}
