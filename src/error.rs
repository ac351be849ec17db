//! Error types.
//!
//! Two layers:
//! - [`NativeError`] is what a backend reports when the OS joystick service refuses
//!   something (a missing device, a failed open, an I/O error while refreshing).
//! - [`DriverError`] is what the driver facade hands back to the input subsystem.
//!
//! Nothing here is fatal to the process. Every error is scoped to one operation
//! (one device open, one feature request) and never corrupts the registry or
//! other open sessions.

use std::collections::TryReserveError;
use std::fmt;
use std::path::PathBuf;

/// Error reported by a native joystick backend.
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    /// The OS reported an I/O failure.
    #[error("native I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No device exists at the given enumeration index.
    #[error("no native device at index {0}")]
    NoSuchDevice(usize),

    /// The path exists but does not name a joystick the backend can drive.
    #[error("{0} is not a joystick device")]
    NotJoystick(String),

    /// The handle was already closed.
    #[error("native handle is closed")]
    Closed,
}

/// Capabilities the native joystick API does not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Rumble,
    RumbleTriggers,
    Led,
    Effect,
    Sensors,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Feature::Rumble => "rumble",
            Feature::RumbleTriggers => "trigger rumble",
            Feature::Led => "LED control",
            Feature::Effect => "output effects",
            Feature::Sensors => "sensors",
        };
        f.write_str(s)
    }
}

/// Error returned by the driver facade.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The slot index is outside the current registry.
    #[error("invalid device slot {slot} (registry holds {count})")]
    InvalidSlot { slot: usize, count: usize },

    /// The native service refused to open the registered path.
    #[error("unable to open device {path}")]
    UnableToOpen {
        path: String,
        #[source]
        source: NativeError,
    },

    /// Scratch buffers for a session could not be reserved.
    #[error("out of memory allocating device buffers")]
    Allocation(#[from] TryReserveError),

    /// The native API has no equivalent for this request.
    #[error("{0} is not supported by this driver")]
    Unsupported(Feature),

    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`DriverConfig`](crate::config::DriverConfig).
    #[error("invalid driver config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl DriverError {
    /// `true` for the uniform "operation not supported" outcome.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DriverError::Unsupported(_))
    }
}
