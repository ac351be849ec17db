//! stickdriver: a polling joystick driver.
//!
//! Bridges a poll-only native joystick service into portable input events:
//! discovers attached controllers, hands out per-session ids and metadata, opens
//! and closes devices, and turns each poll of native state (axes, hats, buttons)
//! into a fixed-order stream of [`InputEvent`]s.
//!
//! Start with [`NativeDriver`] and a backend from [`backends`].

pub mod backends;
pub mod change_filter;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod guid;
pub mod hat;
pub mod logger;
pub mod metadata;
pub mod native;
pub mod registry;
pub mod session;
pub mod snapshot;

pub use change_filter::ChangeFilter;
pub use config::{DriverConfig, MAX_JOYSTICKS};
pub use driver::{GamepadMapping, JoystickDriver, NativeDriver};
pub use error::{DriverError, Feature, NativeError};
pub use event::*;
pub use eventbus::*;
pub use guid::{JoystickGuid, JoystickId};
pub use hat::{map_hat, HatBits, HatDirection};
pub use metadata::DeviceInfo;
pub use native::{NativeHandle, NativeJoystickApi};
pub use registry::{DeviceRegistry, RegistryEntry};
pub use session::DeviceSession;
pub use snapshot::{JoystickState, Snapshot, StateTracker};
