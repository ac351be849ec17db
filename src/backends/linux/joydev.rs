//! Linux joydev backend.
//!
//! Devices are the `js<N>` character devices in a directory (normally `/dev/input`),
//! ordered by `N`. Each handle is opened non-blocking; [`NativeHandle::update`]
//! drains every pending `js_event` and folds it into the current state, so reads
//! after an update see the latest values.
//!
//! # Mapping to the native model
//! - Axes: joydev axis values are already signed 16-bit and calibrated.
//! - Hats: joydev exposes D-pads as a pair of axes, so the hat count is always 0.
//! - Buttons: the first 32 buttons form the button bitmask; higher numbers are dropped.
//!
//! ## Platform notes
//! The ioctl request numbers below use the generic `_IOC` layout (x86, ARM, RISC-V).

use crate::error::NativeError;
use crate::native::{NativeHandle, NativeJoystickApi};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const IOC_READ: u64 = 2;

const fn ior(nr: u64, size: u64) -> u64 {
    (IOC_READ << 30) | (size << 16) | ((b'j' as u64) << 8) | nr
}

const JSIOCGAXES: u64 = ior(0x11, 1);
const JSIOCGBUTTONS: u64 = ior(0x12, 1);
const NAME_LEN: usize = 128;
const JSIOCGNAME: u64 = ior(0x13, NAME_LEN as u64);

const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
const JS_EVENT_INIT: u8 = 0x80;

/// Size of `struct js_event`.
const EVENT_SIZE: usize = 8;

/// Upper bound on events drained per update.
const MAX_EVENTS_PER_UPDATE: usize = 256;

/// joydev device service rooted at one directory.
#[derive(Debug, Clone)]
pub struct JoydevApi {
    dir: PathBuf,
    found: Vec<PathBuf>,
}

impl JoydevApi {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            found: Vec::new(),
        }
    }

    fn scan(&self) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "joydev directory unreadable");
                return Vec::new();
            }
        };

        let mut found: Vec<(u32, PathBuf)> = entries
            .filter_map(Result::ok)
            .filter_map(|e| {
                let name = e.file_name();
                let n = js_number(name.to_str()?)?;
                Some((n, e.path()))
            })
            .collect();
        found.sort_by_key(|(n, _)| *n);
        found.into_iter().map(|(_, p)| p).collect()
    }
}

/// `"js12"` → `Some(12)`.
fn js_number(file_name: &str) -> Option<u32> {
    let digits = file_name.strip_prefix("js")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl NativeJoystickApi for JoydevApi {
    type Handle = JoydevHandle;

    fn count_devices(&mut self) -> usize {
        self.found = self.scan();
        self.found.len()
    }

    fn device_path(&mut self, index: usize) -> Result<String, NativeError> {
        self.found
            .get(index)
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or(NativeError::NoSuchDevice(index))
    }

    fn open(&mut self, path: &str) -> Result<JoydevHandle, NativeError> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;

        let mut naxes: u8 = 0;
        let mut nbuttons: u8 = 0;
        // SAFETY: both requests write exactly one byte into the provided pointer.
        unsafe {
            if libc::ioctl(file.as_raw_fd(), JSIOCGAXES as _, &mut naxes as *mut u8) < 0 {
                return Err(NativeError::NotJoystick(path.to_string()));
            }
            if libc::ioctl(file.as_raw_fd(), JSIOCGBUTTONS as _, &mut nbuttons as *mut u8) < 0 {
                return Err(NativeError::NotJoystick(path.to_string()));
            }
        }

        let mut name = [0u8; NAME_LEN];
        // SAFETY: the request length matches the buffer size.
        let len = unsafe { libc::ioctl(file.as_raw_fd(), JSIOCGNAME as _, name.as_mut_ptr()) };
        let name = if len > 0 {
            let bytes = &name[..(len as usize).min(NAME_LEN)];
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
        } else {
            None
        };

        debug!(path, axes = naxes, buttons = nbuttons, name = ?name, "joydev opened");
        Ok(JoydevHandle {
            file: Some(file),
            name,
            state: JoydevState::new(naxes as usize, nbuttons as usize),
        })
    }
}

/// Accumulated device state, built from `js_event` records.
#[derive(Debug, Clone, PartialEq, Eq)]
struct JoydevState {
    axes: Vec<i16>,
    buttons: u32,
    nbuttons: usize,
}

impl JoydevState {
    fn new(naxes: usize, nbuttons: usize) -> Self {
        Self {
            axes: vec![0; naxes],
            buttons: 0,
            nbuttons,
        }
    }

    /// Fold one raw `js_event` into the state.
    fn apply(&mut self, raw: &[u8; EVENT_SIZE]) {
        let value = i16::from_ne_bytes([raw[4], raw[5]]);
        let kind = raw[6] & !JS_EVENT_INIT;
        let number = raw[7] as usize;

        match kind {
            JS_EVENT_AXIS => {
                if let Some(a) = self.axes.get_mut(number) {
                    *a = value;
                }
            }
            JS_EVENT_BUTTON if number < u32::BITS as usize => {
                if value != 0 {
                    self.buttons |= 1 << number;
                } else {
                    self.buttons &= !(1 << number);
                }
            }
            _ => trace!(kind, number, "ignored joydev event"),
        }
    }
}

/// Open joydev device.
#[derive(Debug)]
pub struct JoydevHandle {
    file: Option<File>,
    name: Option<String>,
    state: JoydevState,
}

impl NativeHandle for JoydevHandle {
    fn controller_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn enable_calibration(&mut self) {
        // The kernel applies its stored correction to every joydev read.
        trace!("joydev values are calibrated by the kernel");
    }

    fn count_axes(&self) -> usize {
        self.state.axes.len()
    }

    fn count_hats(&self) -> usize {
        0
    }

    fn count_buttons(&self) -> usize {
        self.state.nbuttons
    }

    fn update(&mut self) -> Result<(), NativeError> {
        let file = self.file.as_mut().ok_or(NativeError::Closed)?;
        let mut raw = [0u8; EVENT_SIZE];

        for _ in 0..MAX_EVENTS_PER_UPDATE {
            match file.read(&mut raw) {
                Ok(EVENT_SIZE) => self.state.apply(&raw),
                Ok(0) => break,
                Ok(n) => {
                    trace!(n, "short joydev read");
                    break;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn axis_values(&self, out: &mut [i16]) {
        let n = out.len().min(self.state.axes.len());
        out[..n].copy_from_slice(&self.state.axes[..n]);
    }

    fn hat_values(&self, _out: &mut [u8]) {}

    fn button_values(&self) -> u32 {
        self.state.buttons
    }

    fn close(&mut self) {
        self.file = None;
    }
}
