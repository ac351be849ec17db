//! Device identity: instance ids, GUIDs and display names.
//!
//! The native API gives no vendor/product/version information, so identity is
//! derived from what it does give:
//! - [`JoystickId`] is `slot + 1` (zero is reserved for "no device").
//! - [`JoystickGuid`] is derived from the display name alone. Two devices with the
//!   same name share a GUID.
//!
//! # GUID layout
//! ```text
//! bytes 0..2   bus type (0 = unknown), little endian
//! bytes 2..4   CRC-16/ARC of the name, little endian
//! bytes 4..16  name bytes, truncated to 11 and NUL padded
//! ```

use crc::{Crc, CRC_16_ARC};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Bus type recorded in name-derived GUIDs.
pub const BUS_UNKNOWN: u16 = 0x0000;

/// Name used when the native controller-name query yields nothing.
pub const DEFAULT_NAME: &str = "Controller";

const NAME_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Per-enumeration device instance id. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoystickId(NonZeroU32);

impl JoystickId {
    /// Instance id for a registry slot (`slot + 1`).
    ///
    /// Returns `None` only if `slot + 1` does not fit in a `u32`.
    pub fn from_slot(slot: usize) -> Option<Self> {
        let raw = u32::try_from(slot).ok()?.checked_add(1)?;
        NonZeroU32::new(raw).map(JoystickId)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Registry slot this id was derived from.
    #[inline]
    pub fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Display for JoystickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 16-byte joystick GUID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct JoystickGuid(pub [u8; 16]);

impl JoystickGuid {
    /// Build a GUID from a display name only.
    pub fn for_name(name: &str) -> Self {
        let mut data = [0u8; 16];
        let crc = NAME_CRC.checksum(name.as_bytes());
        data[0..2].copy_from_slice(&BUS_UNKNOWN.to_le_bytes());
        data[2..4].copy_from_slice(&crc.to_le_bytes());

        // Room for 11 name bytes; the last byte stays NUL.
        let bytes = name.as_bytes();
        let n = bytes.len().min(data.len() - 4 - 1);
        data[4..4 + n].copy_from_slice(&bytes[..n]);
        JoystickGuid(data)
    }

    pub fn bus(&self) -> u16 {
        u16::from_le_bytes([self.0[0], self.0[1]])
    }

    pub fn crc(&self) -> u16 {
        u16::from_le_bytes([self.0[2], self.0[3]])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for JoystickGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Error parsing a GUID from its hex form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid joystick GUID {input:?}")]
pub struct ParseGuidError {
    input: String,
    #[source]
    source: hex::FromHexError,
}

impl FromStr for JoystickGuid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut data = [0u8; 16];
        hex::decode_to_slice(s, &mut data).map_err(|source| ParseGuidError {
            input: s.to_string(),
            source,
        })?;
        Ok(JoystickGuid(data))
    }
}

impl Serialize for JoystickGuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JoystickGuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalize a native controller name for display.
///
/// Surrounding whitespace is trimmed and internal runs of whitespace collapse to a
/// single space. A missing or blank name becomes [`DEFAULT_NAME`].
pub fn display_name(raw: Option<&str>) -> String {
    let joined = raw
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if joined.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        joined
    }
}
