//! Event delivery.
//!
//! The driver pushes everything it produces into an [`EventSink`]:
//! device-added notifications during enumeration and input events during polling.
//!
//! Two sinks ship with the crate:
//! - `Vec<InputEvent>` collects input events (added notifications are dropped).
//! - [`InputEventBus`] fans events out to registered [`InputListener`]s, each with an
//!   [`EventFilter`] and an optional device tag.

use crate::event::{InputEvent, InputKind};
use crate::guid::JoystickId;
use std::collections::BTreeMap;

/// Receiver for everything the driver emits.
pub trait EventSink {
    /// A device was recorded during enumeration. `id` is the new device count.
    fn device_added(&mut self, id: JoystickId);

    /// One channel value from a poll.
    fn input(&mut self, event: &InputEvent);
}

impl EventSink for Vec<InputEvent> {
    fn device_added(&mut self, _id: JoystickId) {}

    fn input(&mut self, event: &InputEvent) {
        self.push(event.clone());
    }
}

/// Trait for reacting to input from any device.
pub trait InputListener: Send {
    fn on_input(&mut self, event: &InputEvent);

    fn on_device_added(&mut self, _id: JoystickId) {}
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Clone, Copy)]
pub enum EventFilter {
    All,
    AxisOnly,
    ButtonsOnly,
    HatsOnly,
    Custom(fn(&InputEvent) -> bool),
}

impl EventFilter {
    pub fn matches(&self, event: &InputEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::AxisOnly => matches!(event.kind, InputKind::AxisMoved { .. }),
            EventFilter::ButtonsOnly => matches!(
                event.kind,
                InputKind::ButtonPressed { .. } | InputKind::ButtonReleased { .. }
            ),
            EventFilter::HatsOnly => matches!(event.kind, InputKind::HatChanged { .. }),
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener with filters and control flags.
struct ListenerEntry {
    listener: Box<dyn InputListener>,
    enabled: bool,
    filter: EventFilter,
    device: Option<JoystickId>,
}

#[derive(Default)]
pub struct InputEventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl InputEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener, optionally restricted to one device.
    ///
    /// Listeners are invoked in registration order.
    pub fn add_listener(
        &mut self,
        listener: impl InputListener + 'static,
        filter: EventFilter,
        device: Option<JoystickId>,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                device,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener entirely.
    pub fn remove_listener(&mut self, id: u64) {
        self.listeners.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Emits one event to all active and matching listeners.
    pub fn emit(&mut self, event: &InputEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }
            if entry.device.is_some_and(|d| d != event.device) {
                continue;
            }
            if entry.filter.matches(event) {
                entry.listener.on_input(event);
            }
        }
    }

    /// Emits a batch of events to matching listeners.
    pub fn emit_all(&mut self, events: &[InputEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

impl EventSink for InputEventBus {
    fn device_added(&mut self, id: JoystickId) {
        for entry in self.listeners.values_mut() {
            if entry.enabled && entry.device.map_or(true, |d| d == id) {
                entry.listener.on_device_added(id);
            }
        }
    }

    fn input(&mut self, event: &InputEvent) {
        self.emit(event);
    }
}
