//! Device metadata snapshot.
//!
//! [`DeviceInfo`] is a lightweight, cloneable description of a registry slot,
//! suitable for UI display, logging, and persistence.
//!
//! ## Persistence notes
//! - `instance_id` and `slot` are only valid until the next enumeration.
//! - `guid` is derived from the display name alone, so it survives re-enumeration
//!   but cannot tell apart two devices with the same name.
//! - `path` is a native device path; treat it as diagnostic first, identity second.
//!
//! # Example
//! ```
//! use stickdriver::backends::virtual_input::{VirtualJoystickApi, VirtualPort};
//! use stickdriver::{DriverConfig, InputEvent, JoystickDriver, NativeDriver};
//!
//! let mut api = VirtualJoystickApi::new();
//! api.attach(VirtualPort::new("virtual/0", Some("Pad"), 2, 0, 4));
//! let mut driver = NativeDriver::new(api, DriverConfig::default());
//! driver.init(&mut Vec::<InputEvent>::new()).unwrap();
//! for info in driver.devices() {
//!     println!("{info}");
//! }
//! ```

use crate::guid::{JoystickGuid, JoystickId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of metadata describing a single registry slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Registry slot.
    pub slot: usize,
    /// `slot + 1`.
    pub instance_id: JoystickId,
    /// Display name.
    pub name: String,
    /// Native device path.
    pub path: String,
    /// Name-derived GUID.
    pub guid: JoystickGuid,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}) guid={}",
            self.instance_id, self.name, self.path, self.guid
        )
    }
}
