//! The native joystick service, as the driver sees it.
//!
//! Backends implement two traits:
//! - [`NativeJoystickApi`]: device discovery and opening by path.
//! - [`NativeHandle`]: one open device. The driver asks it to refresh, then reads
//!   the whole state at once (axes, hats, a button bitmask).
//!
//! The model is poll-only. Handles never call back into the driver; the host
//! decides when to poll.

use crate::error::NativeError;

/// Discovery and open surface of the OS joystick service.
pub trait NativeJoystickApi {
    type Handle: NativeHandle;

    /// Number of joystick ports the OS currently reports.
    fn count_devices(&mut self) -> usize;

    /// Path of the device at `index` (`0..count_devices()`).
    fn device_path(&mut self, index: usize) -> Result<String, NativeError>;

    /// Open a device by path.
    fn open(&mut self, path: &str) -> Result<Self::Handle, NativeError>;
}

/// One open native device.
///
/// Dropping a handle releases it. [`close`](NativeHandle::close) is called first by
/// the driver so backends can tell the OS they are done before the handle goes away.
pub trait NativeHandle {
    /// Product name reported by the device, if any.
    fn controller_name(&self) -> Option<String>;

    /// Switch the device into calibrated reporting.
    fn enable_calibration(&mut self);

    fn count_axes(&self) -> usize;
    fn count_hats(&self) -> usize;
    fn count_buttons(&self) -> usize;

    /// Pull fresh state from the OS.
    fn update(&mut self) -> Result<(), NativeError>;

    /// Copy the current axis values into `out` (`out.len() == count_axes()`).
    fn axis_values(&self, out: &mut [i16]);

    /// Copy the current hat codes (`0..=8`) into `out` (`out.len() == count_hats()`).
    fn hat_values(&self, out: &mut [u8]);

    /// Button state, one bit per button, button 0 in the least-significant bit.
    fn button_values(&self) -> u32;

    /// Tell the OS the device is no longer in use.
    fn close(&mut self);
}
