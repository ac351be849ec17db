//! Native joystick services for `stickdriver`.
//!
//! Implementations of [`NativeJoystickApi`](crate::native::NativeJoystickApi) for
//! concrete input sources.
//!
//! # Feature flags
//! - **`joydev`** — enables the Linux joystick device backend (default; Linux only).
//!
//! The virtual backend is always available.

#[cfg(all(feature = "joydev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "joydev", target_os = "linux"))))]
pub mod linux;

pub mod virtual_input;
