//! In-process joystick service.
//!
//! [`VirtualJoystickApi`] implements the native traits over a list of scripted
//! [`VirtualPort`]s. It behaves like a real poll-only service: a handle only sees new
//! state after [`NativeHandle::update`], and opening can be made to fail.
//!
//! Each port hands out a [`PortControl`] that can change the live state and read
//! lifecycle counters (opens, closes, releases) after the port was attached.
//!
//! ```
//! use stickdriver::backends::virtual_input::{VirtualJoystickApi, VirtualPort};
//!
//! let port = VirtualPort::new("virtual/0", Some("Virtual Stick"), 2, 1, 8);
//! let control = port.control();
//! let mut api = VirtualJoystickApi::new();
//! api.attach(port);
//! control.set_buttons(0b1);
//! ```

use crate::error::NativeError;
use crate::native::{NativeHandle, NativeJoystickApi};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle counters for one port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PortStats {
    /// Successful opens.
    pub opens: usize,
    /// Calls to [`NativeHandle::close`].
    pub closes: usize,
    /// Handles dropped.
    pub released: usize,
    /// Calls to [`NativeHandle::update`].
    pub updates: usize,
    /// Calls to [`NativeHandle::enable_calibration`].
    pub calibrations: usize,
}

#[derive(Debug)]
struct PortState {
    axes: Vec<i16>,
    hats: Vec<u8>,
    buttons: u32,
    button_count: usize,
    openable: bool,
    stats: PortStats,
}

/// Shared handle onto a port's live state.
#[derive(Clone, Debug)]
pub struct PortControl(Arc<Mutex<PortState>>);

impl PortControl {
    fn lock(&self) -> MutexGuard<'_, PortState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set one axis. Out-of-range indices are ignored.
    pub fn set_axis(&self, axis: usize, value: i16) {
        if let Some(v) = self.lock().axes.get_mut(axis) {
            *v = value;
        }
    }

    /// Set one hat to a native code (`0..=8`). Out-of-range indices are ignored.
    pub fn set_hat(&self, hat: usize, code: u8) {
        if let Some(v) = self.lock().hats.get_mut(hat) {
            *v = code;
        }
    }

    /// Replace the button bitmask.
    pub fn set_buttons(&self, mask: u32) {
        self.lock().buttons = mask;
    }

    /// Make future opens succeed or fail.
    pub fn set_openable(&self, openable: bool) {
        self.lock().openable = openable;
    }

    pub fn stats(&self) -> PortStats {
        self.lock().stats
    }
}

/// A scripted device attached to a [`VirtualJoystickApi`].
#[derive(Debug)]
pub struct VirtualPort {
    path: String,
    controller_name: Option<String>,
    path_queryable: bool,
    control: PortControl,
}

impl VirtualPort {
    /// New port with all axes at 0, hats centered and buttons up.
    pub fn new(
        path: &str,
        controller_name: Option<&str>,
        axes: usize,
        hats: usize,
        buttons: usize,
    ) -> Self {
        let state = PortState {
            axes: vec![0; axes],
            hats: vec![0; hats],
            buttons: 0,
            button_count: buttons,
            openable: true,
            stats: PortStats::default(),
        };
        Self {
            path: path.to_string(),
            controller_name: controller_name.map(str::to_string),
            path_queryable: true,
            control: PortControl(Arc::new(Mutex::new(state))),
        }
    }

    /// Port whose opens always fail.
    pub fn unopenable(self) -> Self {
        self.control.set_openable(false);
        self
    }

    /// Port whose path query fails during enumeration.
    pub fn without_path(mut self) -> Self {
        self.path_queryable = false;
        self
    }

    pub fn control(&self) -> PortControl {
        self.control.clone()
    }
}

/// Scripted joystick service.
#[derive(Debug, Default)]
pub struct VirtualJoystickApi {
    ports: Vec<VirtualPort>,
}

impl VirtualJoystickApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a port and return its control handle.
    pub fn attach(&mut self, port: VirtualPort) -> PortControl {
        let control = port.control();
        self.ports.push(port);
        control
    }

    /// Remove every port whose path matches. Open handles keep working.
    pub fn detach(&mut self, path: &str) {
        self.ports.retain(|p| p.path != path);
    }
}

impl NativeJoystickApi for VirtualJoystickApi {
    type Handle = VirtualHandle;

    fn count_devices(&mut self) -> usize {
        self.ports.len()
    }

    fn device_path(&mut self, index: usize) -> Result<String, NativeError> {
        match self.ports.get(index) {
            Some(p) if p.path_queryable => Ok(p.path.clone()),
            _ => Err(NativeError::NoSuchDevice(index)),
        }
    }

    fn open(&mut self, path: &str) -> Result<VirtualHandle, NativeError> {
        let port = self
            .ports
            .iter()
            .find(|p| p.path == path)
            .ok_or_else(|| NativeError::NotJoystick(path.to_string()))?;

        let control = port.control();
        let (axes, hats, button_count) = {
            let mut st = control.lock();
            if !st.openable {
                return Err(NativeError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("{path} refused to open"),
                )));
            }
            st.stats.opens += 1;
            (st.axes.len(), st.hats.len(), st.button_count)
        };

        Ok(VirtualHandle {
            controller_name: port.controller_name.clone(),
            control,
            axes: vec![0; axes],
            hats: vec![0; hats],
            buttons: 0,
            button_count,
            calibrated: false,
            open: true,
        })
    }
}

/// Open handle on a [`VirtualPort`].
///
/// Holds the state captured by the last `update`, like a real native handle.
#[derive(Debug)]
pub struct VirtualHandle {
    controller_name: Option<String>,
    control: PortControl,
    axes: Vec<i16>,
    hats: Vec<u8>,
    buttons: u32,
    button_count: usize,
    calibrated: bool,
    open: bool,
}

impl VirtualHandle {
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

impl NativeHandle for VirtualHandle {
    fn controller_name(&self) -> Option<String> {
        self.controller_name.clone()
    }

    fn enable_calibration(&mut self) {
        self.calibrated = true;
        self.control.lock().stats.calibrations += 1;
    }

    fn count_axes(&self) -> usize {
        self.axes.len()
    }

    fn count_hats(&self) -> usize {
        self.hats.len()
    }

    fn count_buttons(&self) -> usize {
        self.button_count
    }

    fn update(&mut self) -> Result<(), NativeError> {
        if !self.open {
            return Err(NativeError::Closed);
        }
        let mut st = self.control.lock();
        st.stats.updates += 1;
        self.axes.copy_from_slice(&st.axes);
        self.hats.copy_from_slice(&st.hats);
        self.buttons = st.buttons;
        Ok(())
    }

    fn axis_values(&self, out: &mut [i16]) {
        let n = out.len().min(self.axes.len());
        out[..n].copy_from_slice(&self.axes[..n]);
    }

    fn hat_values(&self, out: &mut [u8]) {
        let n = out.len().min(self.hats.len());
        out[..n].copy_from_slice(&self.hats[..n]);
    }

    fn button_values(&self) -> u32 {
        self.buttons
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.control.lock().stats.closes += 1;
        }
    }
}

impl Drop for VirtualHandle {
    fn drop(&mut self) {
        self.control.lock().stats.released += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_sees_state_only_after_update() {
        let mut api = VirtualJoystickApi::new();
        let control = api.attach(VirtualPort::new("v/0", Some("V"), 2, 1, 3));
        let mut h = api.open("v/0").unwrap();

        control.set_axis(1, -200);
        control.set_hat(0, 3);
        control.set_buttons(0b10);

        let mut axes = [0i16; 2];
        h.axis_values(&mut axes);
        assert_eq!(axes, [0, 0]);

        h.update().unwrap();
        h.axis_values(&mut axes);
        let mut hats = [0u8; 1];
        h.hat_values(&mut hats);
        assert_eq!(axes, [0, -200]);
        assert_eq!(hats, [3]);
        assert_eq!(h.button_values(), 0b10);
    }

    #[test]
    fn unknown_path_and_unopenable_port_fail() {
        let mut api = VirtualJoystickApi::new();
        let control = api.attach(VirtualPort::new("v/0", None, 0, 0, 0));
        assert!(matches!(api.open("v/9"), Err(NativeError::NotJoystick(_))));

        control.set_openable(false);
        assert!(api.open("v/0").is_err());
        assert_eq!(control.stats().opens, 0);
    }

    #[test]
    fn close_then_drop_counts_once_each() {
        let mut api = VirtualJoystickApi::new();
        let control = api.attach(VirtualPort::new("v/0", None, 0, 0, 0));
        let mut h = api.open("v/0").unwrap();
        h.close();
        h.close();
        assert!(matches!(h.update(), Err(NativeError::Closed)));
        drop(h);

        let s = control.stats();
        assert_eq!((s.opens, s.closes, s.released), (1, 1, 1));
    }

    #[test]
    fn path_query_can_fail() {
        let mut api = VirtualJoystickApi::new();
        api.attach(VirtualPort::new("v/0", None, 0, 0, 0).without_path());
        assert!(api.device_path(0).is_err());
        assert!(api.device_path(5).is_err());
    }
}
