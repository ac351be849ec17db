//! Events and channel descriptions.
//!
//! The driver reports device state as small, device-agnostic values ([`InputKind`])
//! wrapped with the capture time and the device's instance id ([`InputEvent`]).
//!
//! ## Value conventions
//! - **Axes:** raw signed 16-bit values as reported by the native device in calibrated
//!   mode. No further normalization is applied.
//! - **Buttons:** the current state, expressed as `ButtonPressed` / `ButtonReleased`.
//! - **Hats:** a [`HatDirection`] (centered or one of eight directions).
//!
//! ### Full-state reports
//! Every poll reports every channel, changed or not. Consumers that only want
//! transitions should run events through a
//! [`StateTracker`](crate::snapshot::StateTracker), which coalesces repeats.

use crate::guid::JoystickId;
use crate::hat::HatDirection;
use std::time::Instant;

/// Per-device input value.
///
/// The `axis`/`button`/`hat` indices are device-local channel indices as described by [`ChannelDesc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Current position of a continuous axis.
    AxisMoved { axis: u16, value: i16 },

    /// The button is currently held.
    ButtonPressed { button: u16 },

    /// The button is currently up.
    ButtonReleased { button: u16 },

    /// Current hat position.
    HatChanged { hat: u16, value: HatDirection },
}

impl InputKind {
    pub fn button(button: u16, down: bool) -> Self {
        if down {
            InputKind::ButtonPressed { button }
        } else {
            InputKind::ButtonReleased { button }
        }
    }
}

/// Timestamped input event produced by one `update` call.
///
/// All events from the same call share the same `at`.
#[derive(Clone, Debug)]
pub struct InputEvent {
    /// Capture time (monotonic), taken once at the start of the poll.
    pub at: Instant,
    /// Instance id of the device that produced the event.
    pub device: JoystickId,
    /// The reported value.
    pub kind: InputKind,
}

/// Category of an input channel on a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Axis,
    Button,
    Hat,
}

/// Describes a channel exposed by an open device.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelDesc {
    /// Channel category.
    pub kind: ChannelKind,
    /// Device-local channel index (matches indices used in [`InputKind`]).
    pub idx: u16,
    /// Short label (`"axis0"`, `"hat1"`, `"button3"`).
    pub name: String,
    /// Smallest value the channel reports.
    pub logical_min: i32,
    /// Largest value the channel reports.
    pub logical_max: i32,
}

impl ChannelDesc {
    pub fn axis(idx: u16) -> Self {
        Self {
            kind: ChannelKind::Axis,
            idx,
            name: format!("axis{idx}"),
            logical_min: i16::MIN as i32,
            logical_max: i16::MAX as i32,
        }
    }

    /// Hats are described by their native code range (`0` centered, `1..=8` directions).
    pub fn hat(idx: u16) -> Self {
        Self {
            kind: ChannelKind::Hat,
            idx,
            name: format!("hat{idx}"),
            logical_min: 0,
            logical_max: 8,
        }
    }

    pub fn button(idx: u16) -> Self {
        Self {
            kind: ChannelKind::Button,
            idx,
            name: format!("button{idx}"),
            logical_min: 0,
            logical_max: 1,
        }
    }
}
