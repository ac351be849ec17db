use crate::event::{InputEvent, InputKind};
use crate::eventbus::InputListener;
use crate::guid::JoystickId;
use tracing::{info, trace};

/// A listener that logs every event through `tracing`.
///
/// Input events go to `trace` (a polled device reports every channel on every
/// poll); device arrivals go to `info`.
#[derive(Debug, Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl InputListener for Logger {
    fn on_input(&mut self, event: &InputEvent) {
        match event.kind {
            InputKind::AxisMoved { axis, value } => {
                trace!(device = %event.device, axis, value, "axis")
            }
            InputKind::HatChanged { hat, value } => {
                trace!(device = %event.device, hat, value = ?value, "hat")
            }
            InputKind::ButtonPressed { button } => {
                trace!(device = %event.device, button, down = true, "button")
            }
            InputKind::ButtonReleased { button } => {
                trace!(device = %event.device, button, down = false, "button")
            }
        }
    }

    fn on_device_added(&mut self, id: JoystickId) {
        info!(device = %id, "joystick added");
    }
}
