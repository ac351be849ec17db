//! Driver facade.
//!
//! [`JoystickDriver`] is the fixed set of operations an input subsystem calls on a
//! platform joystick driver. [`NativeDriver`] implements it on top of any
//! [`NativeJoystickApi`], owning the [`DeviceRegistry`] it enumerates into.
//!
//! Typical lifecycle:
//! ```
//! use stickdriver::backends::virtual_input::{VirtualJoystickApi, VirtualPort};
//! use stickdriver::{DriverConfig, InputEvent, JoystickDriver, NativeDriver};
//!
//! let mut api = VirtualJoystickApi::new();
//! api.attach(VirtualPort::new("virtual/0", Some("Pad"), 2, 1, 4));
//!
//! let mut driver = NativeDriver::new(api, DriverConfig::default());
//! let mut events: Vec<InputEvent> = Vec::new();
//! driver.init(&mut events).unwrap();
//!
//! let mut pad = driver.open(0).unwrap();
//! driver.update(&mut pad, &mut events);
//! assert_eq!(events.len(), 2 + 1 + 4);
//!
//! driver.close(&mut pad);
//! driver.quit();
//! ```
//!
//! The driver never spawns threads or blocks beyond the native calls themselves; the
//! host decides how often to call [`JoystickDriver::update`].

use crate::config::DriverConfig;
use crate::error::{DriverError, Feature};
use crate::eventbus::EventSink;
use crate::guid::{JoystickGuid, JoystickId};
use crate::metadata::DeviceInfo;
use crate::native::NativeJoystickApi;
use crate::registry::DeviceRegistry;
use crate::session::DeviceSession;
use std::time::Instant;
use tracing::{debug, info};

/// Controller layout description used by gamepad abstractions.
///
/// No driver in this crate produces one; the type exists so
/// [`JoystickDriver::gamepad_mapping`] has a concrete answer type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadMapping {
    pub guid: JoystickGuid,
    pub mapping: String,
}

/// Operations the input subsystem performs on a platform joystick driver.
pub trait JoystickDriver {
    type Session;

    /// Discover devices. Reports each one through `sink.device_added`.
    fn init(&mut self, sink: &mut dyn EventSink) -> Result<(), DriverError>;

    /// Number of discovered devices.
    fn count(&self) -> usize;

    /// Look for newly attached or removed devices.
    fn detect(&mut self);

    /// Whether this driver claims a device that another driver found.
    fn is_device_present(&self, vendor: u16, product: u16, version: u16, name: &str) -> bool;

    fn device_name(&self, slot: usize) -> Option<&str>;
    fn device_path(&self, slot: usize) -> Option<&str>;
    fn steam_virtual_gamepad_slot(&self, slot: usize) -> Option<u32>;
    fn player_index(&self, slot: usize) -> Option<u32>;
    fn set_player_index(&mut self, slot: usize, index: Option<u32>);
    fn guid(&self, slot: usize) -> Option<JoystickGuid>;
    fn instance_id(&self, slot: usize) -> Option<JoystickId>;

    /// Open the device in `slot`.
    fn open(&mut self, slot: usize) -> Result<Self::Session, DriverError>;

    fn rumble(
        &mut self,
        session: &mut Self::Session,
        low: u16,
        high: u16,
    ) -> Result<(), DriverError>;
    fn rumble_triggers(
        &mut self,
        session: &mut Self::Session,
        left: u16,
        right: u16,
    ) -> Result<(), DriverError>;
    fn set_led(
        &mut self,
        session: &mut Self::Session,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), DriverError>;
    fn send_effect(&mut self, session: &mut Self::Session, data: &[u8]) -> Result<(), DriverError>;
    fn set_sensors_enabled(
        &mut self,
        session: &mut Self::Session,
        enabled: bool,
    ) -> Result<(), DriverError>;

    /// Poll one device and report its channels to `sink`.
    fn update(&mut self, session: &mut Self::Session, sink: &mut dyn EventSink);

    /// Release a session. Safe to call more than once.
    fn close(&mut self, session: &mut Self::Session);

    /// Release the device registry.
    fn quit(&mut self);

    fn gamepad_mapping(&self, slot: usize) -> Option<GamepadMapping>;
}

/// Joystick driver over a poll-only native service.
pub struct NativeDriver<A: NativeJoystickApi> {
    api: A,
    registry: DeviceRegistry,
    config: DriverConfig,
}

impl<A: NativeJoystickApi> NativeDriver<A> {
    pub fn new(api: A, config: DriverConfig) -> Self {
        Self {
            api,
            registry: DeviceRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Access the native service (e.g. to attach virtual ports before `init`).
    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// Metadata for every discovered device, in slot order.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        (0..self.registry.len())
            .filter_map(|slot| self.registry.info(slot))
            .collect()
    }
}

impl<A: NativeJoystickApi> JoystickDriver for NativeDriver<A> {
    type Session = DeviceSession<A::Handle>;

    fn init(&mut self, sink: &mut dyn EventSink) -> Result<(), DriverError> {
        let found = self
            .registry
            .enumerate(&mut self.api, &self.config, |id| sink.device_added(id));
        info!(count = found, "joystick driver initialized");
        Ok(())
    }

    fn count(&self) -> usize {
        self.registry.len()
    }

    fn detect(&mut self) {}

    fn is_device_present(&self, _vendor: u16, _product: u16, _version: u16, _name: &str) -> bool {
        false
    }

    fn device_name(&self, slot: usize) -> Option<&str> {
        self.registry.name(slot)
    }

    fn device_path(&self, slot: usize) -> Option<&str> {
        self.registry.path(slot)
    }

    fn steam_virtual_gamepad_slot(&self, _slot: usize) -> Option<u32> {
        None
    }

    fn player_index(&self, _slot: usize) -> Option<u32> {
        None
    }

    fn set_player_index(&mut self, _slot: usize, _index: Option<u32>) {}

    fn guid(&self, slot: usize) -> Option<JoystickGuid> {
        self.registry.guid(slot)
    }

    fn instance_id(&self, slot: usize) -> Option<JoystickId> {
        self.registry.instance_id(slot)
    }

    fn open(&mut self, slot: usize) -> Result<Self::Session, DriverError> {
        let (entry, id) = match (self.registry.get(slot), JoystickId::from_slot(slot)) {
            (Some(entry), Some(id)) => (entry, id),
            _ => {
                return Err(DriverError::InvalidSlot {
                    slot,
                    count: self.registry.len(),
                })
            }
        };

        let handle = self.api.open(&entry.path).map_err(|source| {
            debug!(slot, path = %entry.path, error = %source, "native open failed");
            DriverError::UnableToOpen {
                path: entry.path.clone(),
                source,
            }
        })?;

        DeviceSession::start(handle, id, entry.name.clone(), entry.path.clone())
    }

    fn rumble(
        &mut self,
        _session: &mut Self::Session,
        _low: u16,
        _high: u16,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(Feature::Rumble))
    }

    fn rumble_triggers(
        &mut self,
        _session: &mut Self::Session,
        _left: u16,
        _right: u16,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(Feature::RumbleTriggers))
    }

    fn set_led(
        &mut self,
        _session: &mut Self::Session,
        _red: u8,
        _green: u8,
        _blue: u8,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(Feature::Led))
    }

    fn send_effect(
        &mut self,
        _session: &mut Self::Session,
        _data: &[u8],
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(Feature::Effect))
    }

    fn set_sensors_enabled(
        &mut self,
        _session: &mut Self::Session,
        _enabled: bool,
    ) -> Result<(), DriverError> {
        Err(DriverError::Unsupported(Feature::Sensors))
    }

    fn update(&mut self, session: &mut Self::Session, sink: &mut dyn EventSink) {
        session.poll(Instant::now(), sink);
    }

    fn close(&mut self, session: &mut Self::Session) {
        session.close();
    }

    fn quit(&mut self) {
        self.registry.clear();
        debug!("joystick registry released");
    }

    fn gamepad_mapping(&self, _slot: usize) -> Option<GamepadMapping> {
        None
    }
}
