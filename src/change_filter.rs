//! Change-only delivery for bus listeners.
//!
//! The driver reports every channel on every poll. [`ChangeFilter`] sits on an
//! [`InputEventBus`](crate::eventbus::InputEventBus) in front of another listener
//! and forwards only values that differ from the last one it forwarded for the
//! same device and channel. Axis movements smaller than the configured threshold
//! are held back.
//!
//! Memory is one [`JoystickState`] per device seen, sized by its channel counts.

use crate::event::{InputEvent, InputKind};
use crate::eventbus::InputListener;
use crate::guid::JoystickId;
use crate::snapshot::JoystickState;
use std::collections::BTreeMap;

/// Wraps a listener and forwards only changed values.
///
/// A device-added notification resets what was forwarded for that id, so the
/// first poll after (re)enumeration reaches the inner listener in full.
pub struct ChangeFilter {
    inner: Box<dyn InputListener>,
    axis_threshold: u16,
    forwarded: BTreeMap<JoystickId, JoystickState>,
}

impl ChangeFilter {
    pub fn new(inner: impl InputListener + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            axis_threshold: 0,
            forwarded: BTreeMap::new(),
        }
    }

    /// Hold back axis moves smaller than `threshold` from the last forwarded value.
    pub fn with_axis_threshold(mut self, threshold: u16) -> Self {
        self.axis_threshold = threshold;
        self
    }

    fn passes(&mut self, event: &InputEvent) -> bool {
        let state = self.forwarded.entry(event.device).or_default();
        if let InputKind::AxisMoved { axis, value } = event.kind {
            if let Some(&last) = state.axes.get(axis as usize) {
                let delta = (i32::from(value) - i32::from(last)).unsigned_abs();
                if delta < u32::from(self.axis_threshold) {
                    return false;
                }
            }
        }
        state.apply(&event.kind)
    }
}

impl InputListener for ChangeFilter {
    fn on_input(&mut self, event: &InputEvent) {
        if self.passes(event) {
            self.inner.on_input(event);
        }
    }

    fn on_device_added(&mut self, id: JoystickId) {
        self.forwarded.remove(&id);
        self.inner.on_device_added(id);
    }
}
