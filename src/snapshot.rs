//! Per-device state and snapshots.
//!
//! The driver reports every channel on every poll. [`StateTracker`] is the
//! consumer-side piece that folds those reports into a [`JoystickState`] per device
//! and counts only the ones that changed something.
//!
//! [`Snapshot`] is an **owned**, read-only copy of all tracked states at a point in
//! time (typically "this frame").
//!
//! # Examples
//! ```
//! use stickdriver::snapshot::{Snapshot, StateTracker};
//!
//! fn print_buttons(snap: &Snapshot) {
//!     for (dev, state) in snap.iter() {
//!         println!("{dev}: trigger={}", state.button(0));
//!     }
//! }
//!
//! let tracker = StateTracker::new();
//! print_buttons(&tracker.snapshot());
//! ```

use crate::event::{InputEvent, InputKind};
use crate::eventbus::EventSink;
use crate::guid::JoystickId;
use crate::hat::HatDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last reported value of every channel on one device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickState {
    pub axes: Vec<i16>,
    pub hats: Vec<HatDirection>,
    pub buttons: Vec<bool>,
}

impl JoystickState {
    /// Apply one reported value. Returns `true` if it differs from what was stored.
    ///
    /// Channels are created on first report; a new channel counts as a change.
    pub fn apply(&mut self, kind: &InputKind) -> bool {
        match *kind {
            InputKind::AxisMoved { axis, value } => store(&mut self.axes, axis, value),
            InputKind::HatChanged { hat, value } => store(&mut self.hats, hat, value),
            InputKind::ButtonPressed { button } => store(&mut self.buttons, button, true),
            InputKind::ButtonReleased { button } => store(&mut self.buttons, button, false),
        }
    }

    /// Axis value (0 if never reported).
    pub fn axis(&self, idx: usize) -> i16 {
        self.axes.get(idx).copied().unwrap_or(0)
    }

    /// Hat direction (centered if never reported).
    pub fn hat(&self, idx: usize) -> HatDirection {
        self.hats.get(idx).copied().unwrap_or_default()
    }

    /// Button state (released if never reported).
    pub fn button(&self, idx: usize) -> bool {
        self.buttons.get(idx).copied().unwrap_or(false)
    }
}

fn store<T: Copy + Default + PartialEq>(slots: &mut Vec<T>, idx: u16, value: T) -> bool {
    let idx = idx as usize;
    if idx >= slots.len() {
        slots.resize(idx + 1, T::default());
        slots[idx] = value;
        return true;
    }
    if slots[idx] == value {
        return false;
    }
    slots[idx] = value;
    true
}

/// Owned snapshot of device states (`instance id → state`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot(pub BTreeMap<JoystickId, JoystickState>);

impl Snapshot {
    /// Get the state for a specific device.
    #[inline]
    pub fn get(&self, device: JoystickId) -> Option<&JoystickState> {
        self.0.get(&device)
    }

    /// Iterate `(device, state)` pairs in id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&JoystickId, &JoystickState)> {
        self.0.iter()
    }

    /// Consume the snapshot and return the inner map.
    #[inline]
    pub fn into_inner(self) -> BTreeMap<JoystickId, JoystickState> {
        self.0
    }
}

/// Folds full-state reports into per-device state, counting real changes.
///
/// The tracker is an [`EventSink`] its owner passes to
/// [`JoystickDriver::update`](crate::driver::JoystickDriver::update) and drains with
/// [`drain_changes`](Self::drain_changes) each frame. It is not a bus listener:
/// changes pile up until drained. Listeners on a bus that only want changes use
/// [`ChangeFilter`](crate::change_filter::ChangeFilter).
#[derive(Debug, Default)]
pub struct StateTracker {
    states: BTreeMap<JoystickId, JoystickState>,
    changes: Vec<InputEvent>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event. Returns `true` if it changed the device's state.
    pub fn track(&mut self, event: &InputEvent) -> bool {
        let changed = self.states.entry(event.device).or_default().apply(&event.kind);
        if changed {
            self.changes.push(event.clone());
        }
        changed
    }

    /// Events that changed state since the last call.
    pub fn drain_changes(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.changes)
    }

    pub fn state(&self, device: JoystickId) -> Option<&JoystickState> {
        self.states.get(&device)
    }

    /// Forget a device (after it was closed).
    pub fn forget(&mut self, device: JoystickId) {
        self.states.remove(&device);
        self.changes.retain(|e| e.device != device);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.states.clone())
    }
}

impl EventSink for StateTracker {
    fn device_added(&mut self, _id: JoystickId) {}

    fn input(&mut self, event: &InputEvent) {
        self.track(event);
    }
}
