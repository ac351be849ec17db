//! Driver configuration.
//!
//! [`DriverConfig`] is plain serde data, so hosts can keep it in their own TOML
//! settings file or load a standalone one:
//!
//! ```toml
//! max_devices = 8
//! warn_on_skipped = true
//! joydev_dir = "/dev/input"
//! ```
//!
//! Every field has a default; an empty document yields [`DriverConfig::default`].

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hard cap on the number of devices the registry will hold.
pub const MAX_JOYSTICKS: usize = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// How many devices enumeration records. Values above [`MAX_JOYSTICKS`] are clamped.
    pub max_devices: usize,

    /// Log devices skipped during enumeration at `warn` instead of `debug`.
    pub warn_on_skipped: bool,

    /// Directory scanned by the Linux joydev backend.
    pub joydev_dir: PathBuf,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_devices: MAX_JOYSTICKS,
            warn_on_skipped: false,
            joydev_dir: PathBuf::from("/dev/input"),
        }
    }
}

impl DriverConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, DriverError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Effective device cap (never above [`MAX_JOYSTICKS`]).
    #[inline]
    pub fn device_limit(&self) -> usize {
        self.max_devices.min(MAX_JOYSTICKS)
    }
}
