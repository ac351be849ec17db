//! Device registry.
//!
//! Holds the `(path, name)` pair for every device found by enumeration, in slot
//! order. Slots are contiguous from `0` to `len() - 1`. The registry is rebuilt
//! wholesale by [`DeviceRegistry::enumerate`] and emptied by
//! [`DeviceRegistry::clear`]; nothing mutates it in between.

use crate::config::DriverConfig;
use crate::guid::{display_name, JoystickGuid, JoystickId};
use crate::metadata::DeviceInfo;
use crate::native::{NativeHandle, NativeJoystickApi};
use tracing::{debug, warn};

/// One discovered device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Native path used to open the device.
    pub path: String,
    /// Display name.
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct DeviceRegistry {
    entries: Vec<RegistryEntry>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any previous contents and open every native device once to read its name.
    ///
    /// A device is recorded when its path can be queried and a transient open
    /// succeeds. The transient handle is closed before moving on. `on_added` is
    /// called with the id of each recorded device, in slot order.
    ///
    /// Returns the number of recorded devices.
    pub fn enumerate<A, F>(&mut self, api: &mut A, config: &DriverConfig, mut on_added: F) -> usize
    where
        A: NativeJoystickApi,
        F: FnMut(JoystickId),
    {
        self.entries.clear();

        let limit = config.device_limit();
        let ports = api.count_devices();
        debug!(ports, limit, "enumerating joysticks");

        for index in 0..ports {
            if self.entries.len() >= limit {
                break;
            }

            let path = match api.device_path(index) {
                Ok(p) => p,
                Err(e) => {
                    skipped(config, index, None, &e);
                    continue;
                }
            };

            let mut handle = match api.open(&path) {
                Ok(h) => h,
                Err(e) => {
                    skipped(config, index, Some(&path), &e);
                    continue;
                }
            };
            let name = display_name(handle.controller_name().as_deref());
            handle.close();
            drop(handle);

            debug!(slot = self.entries.len(), %path, %name, "joystick found");
            self.entries.push(RegistryEntry { path, name });

            if let Some(id) = JoystickId::from_slot(self.entries.len() - 1) {
                on_added(id);
            }
        }

        self.entries.len()
    }

    /// Release every entry. Safe on an empty registry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&RegistryEntry> {
        self.entries.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn name(&self, slot: usize) -> Option<&str> {
        self.get(slot).map(|e| e.name.as_str())
    }

    pub fn path(&self, slot: usize) -> Option<&str> {
        self.get(slot).map(|e| e.path.as_str())
    }

    /// `slot + 1` for occupied slots.
    pub fn instance_id(&self, slot: usize) -> Option<JoystickId> {
        self.get(slot).and_then(|_| JoystickId::from_slot(slot))
    }

    pub fn guid(&self, slot: usize) -> Option<JoystickGuid> {
        self.name(slot).map(JoystickGuid::for_name)
    }

    /// Metadata snapshot for one slot.
    pub fn info(&self, slot: usize) -> Option<DeviceInfo> {
        let entry = self.get(slot)?;
        Some(DeviceInfo {
            slot,
            instance_id: JoystickId::from_slot(slot)?,
            name: entry.name.clone(),
            path: entry.path.clone(),
            guid: JoystickGuid::for_name(&entry.name),
        })
    }
}

fn skipped(config: &DriverConfig, index: usize, path: Option<&str>, err: &dyn std::error::Error) {
    if config.warn_on_skipped {
        warn!(index, path, error = %err, "skipping unusable joystick");
    } else {
        debug!(index, path, error = %err, "skipping unusable joystick");
    }
}
