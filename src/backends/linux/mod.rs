//! Linux input backends.
//!
//! - **joydev**: the classic joystick interface at `/dev/input/js*`. The kernel keeps
//!   per-device calibration and reports already-corrected axis values.
//!
//! Most users should go through [`NativeDriver`](crate::driver::NativeDriver):
//! ```no_run
//! use stickdriver::backends::linux::JoydevApi;
//! use stickdriver::{DriverConfig, InputEvent, JoystickDriver, NativeDriver};
//!
//! let config = DriverConfig::default();
//! let mut driver = NativeDriver::new(JoydevApi::new(&config.joydev_dir), config);
//! driver.init(&mut Vec::<InputEvent>::new()).unwrap();
//! ```

pub mod joydev;

pub use joydev::{JoydevApi, JoydevHandle};
