//! Open device sessions.
//!
//! A [`DeviceSession`] owns one native handle plus the scratch buffers the poll
//! loop reads into. Buffer sizes come from the counts the device reports at open
//! time and never change afterwards, so polling does not allocate.
//!
//! This module does **not**:
//! - remember previous values or suppress unchanged ones (see
//!   [`StateTracker`](crate::snapshot::StateTracker))
//! - rescale axis values beyond what the device's calibrated mode reports

use crate::error::DriverError;
use crate::event::{ChannelDesc, InputEvent, InputKind};
use crate::eventbus::EventSink;
use crate::guid::{JoystickGuid, JoystickId};
use crate::hat::map_hat;
use crate::native::NativeHandle;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Width of the native button bitmask.
pub const MAX_BUTTONS: usize = u32::BITS as usize;

/// State of one open device.
#[derive(Debug)]
pub struct DeviceSession<H: NativeHandle> {
    handle: Option<H>,
    instance_id: JoystickId,
    name: String,
    path: String,
    naxes: usize,
    nhats: usize,
    nbuttons: usize,
    axes: Vec<i16>,
    hats: Vec<u8>,
    buttons: u32,
}

impl<H: NativeHandle> DeviceSession<H> {
    /// Wrap a freshly opened handle.
    ///
    /// Puts the device into calibrated mode, reads its channel counts and reserves
    /// the scratch buffers. If reservation fails the handle is closed before the
    /// error is returned.
    pub(crate) fn start(
        mut handle: H,
        instance_id: JoystickId,
        name: String,
        path: String,
    ) -> Result<Self, DriverError> {
        handle.enable_calibration();

        let naxes = handle.count_axes();
        let nhats = handle.count_hats();
        let nbuttons = handle.count_buttons();
        if nbuttons > MAX_BUTTONS {
            warn!(
                device = %instance_id,
                reported = nbuttons,
                "device reports more buttons than the native bitmask holds; extra buttons report released"
            );
        }

        let mut session = Self {
            handle: Some(handle),
            instance_id,
            name,
            path,
            naxes,
            nhats,
            nbuttons,
            axes: Vec::new(),
            hats: Vec::new(),
            buttons: 0,
        };

        if let Err(e) = session.reserve() {
            session.close();
            return Err(e);
        }

        debug!(
            device = %instance_id,
            path = %session.path,
            axes = naxes,
            hats = nhats,
            buttons = nbuttons,
            "joystick opened"
        );
        Ok(session)
    }

    fn reserve(&mut self) -> Result<(), DriverError> {
        self.axes.try_reserve_exact(self.naxes)?;
        self.hats.try_reserve_exact(self.nhats)?;
        self.axes.resize(self.naxes, 0);
        self.hats.resize(self.nhats, 0);
        Ok(())
    }

    /// Refresh the native state and report every channel to `sink`.
    ///
    /// Order is fixed: all axes, then all hats, then all buttons, each ascending.
    /// Every event carries `now`. A failed refresh is logged and the last state the
    /// handle holds is reported anyway. A closed session reports nothing.
    pub fn poll(&mut self, now: Instant, sink: &mut dyn EventSink) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        if let Err(e) = handle.update() {
            debug!(device = %self.instance_id, error = %e, "native refresh failed");
        }
        handle.axis_values(&mut self.axes);
        handle.hat_values(&mut self.hats);
        self.buttons = handle.button_values();

        let device = self.instance_id;
        let mut emit = |kind: InputKind| {
            sink.input(&InputEvent {
                at: now,
                device,
                kind,
            })
        };

        for (i, &value) in self.axes.iter().enumerate() {
            emit(InputKind::AxisMoved {
                axis: i as u16,
                value,
            });
        }

        for (i, &code) in self.hats.iter().enumerate() {
            if code > 8 {
                trace!(device = %device, hat = i, code, "hat code out of range, reporting centered");
            }
            emit(InputKind::HatChanged {
                hat: i as u16,
                value: map_hat(code),
            });
        }

        // Indices past the mask width see the drained mask and report released.
        let mut buttons = self.buttons;
        for i in 0..self.nbuttons {
            emit(InputKind::button(i as u16, buttons & 0x01 != 0));
            buttons >>= 1;
        }
    }

    /// Release the native handle and the scratch buffers.
    ///
    /// Calling this more than once, or on a session whose setup failed, is a no-op.
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.close();
            drop(handle);
            self.axes = Vec::new();
            self.hats = Vec::new();
            debug!(device = %self.instance_id, "joystick closed");
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn instance_id(&self) -> JoystickId {
        self.instance_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn guid(&self) -> JoystickGuid {
        JoystickGuid::for_name(&self.name)
    }

    pub fn axis_count(&self) -> usize {
        self.naxes
    }

    pub fn hat_count(&self) -> usize {
        self.nhats
    }

    pub fn button_count(&self) -> usize {
        self.nbuttons
    }

    /// Channel list matching the indices `poll` reports.
    pub fn describe(&self) -> Vec<ChannelDesc> {
        let mut out = Vec::with_capacity(self.naxes + self.nhats + self.nbuttons);
        out.extend((0..self.naxes).map(|i| ChannelDesc::axis(i as u16)));
        out.extend((0..self.nhats).map(|i| ChannelDesc::hat(i as u16)));
        out.extend((0..self.nbuttons).map(|i| ChannelDesc::button(i as u16)));
        out
    }
}

impl<H: NativeHandle> Drop for DeviceSession<H> {
    fn drop(&mut self) {
        self.close();
    }
}
