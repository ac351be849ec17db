use stickdriver::backends::virtual_input::{PortControl, VirtualJoystickApi, VirtualPort};
use stickdriver::{
    DriverConfig, DriverError, EventSink, HatDirection, InputEvent, InputKind, JoystickDriver,
    JoystickGuid, JoystickId, NativeDriver, MAX_JOYSTICKS,
};

/// Records both notifications and input.
#[derive(Default)]
struct Recorder {
    added: Vec<u32>,
    events: Vec<InputEvent>,
}

impl EventSink for Recorder {
    fn device_added(&mut self, id: JoystickId) {
        self.added.push(id.get());
    }

    fn input(&mut self, event: &InputEvent) {
        self.events.push(event.clone());
    }
}

impl Recorder {
    fn kinds(&self) -> Vec<InputKind> {
        self.events.iter().map(|e| e.kind.clone()).collect()
    }
}

fn driver_with(ports: Vec<VirtualPort>) -> (NativeDriver<VirtualJoystickApi>, Vec<PortControl>) {
    let mut api = VirtualJoystickApi::new();
    let controls = ports.into_iter().map(|p| api.attach(p)).collect();
    (NativeDriver::new(api, DriverConfig::default()), controls)
}

#[test]
fn zero_devices_still_initializes() {
    let (mut driver, _) = driver_with(vec![]);
    let mut rec = Recorder::default();
    assert!(driver.init(&mut rec).is_ok());
    assert_eq!(driver.count(), 0);
    assert!(rec.added.is_empty());
}

#[test]
fn enumeration_caps_at_sixteen() {
    let ports = (0..20)
        .map(|i| VirtualPort::new(&format!("usb/{i}"), Some("Pad"), 1, 0, 1))
        .collect();
    let (mut driver, _) = driver_with(ports);
    let mut rec = Recorder::default();
    driver.init(&mut rec).unwrap();

    assert_eq!(driver.count(), MAX_JOYSTICKS);
    assert_eq!(rec.added, (1..=16).collect::<Vec<u32>>());
    assert_eq!(driver.device_path(15), Some("usb/15"));
    assert_eq!(driver.device_path(16), None);
}

#[test]
fn instance_ids_are_slot_plus_one_and_unique() {
    let ports = (0..5)
        .map(|i| VirtualPort::new(&format!("usb/{i}"), None, 0, 0, 0))
        .collect();
    let (mut driver, _) = driver_with(ports);
    driver.init(&mut Recorder::default()).unwrap();

    let ids: Vec<u32> = (0..driver.count())
        .map(|slot| driver.instance_id(slot).unwrap().get())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert!(ids.iter().all(|&id| id != 0));
}

#[test]
fn guid_comes_from_name_only() {
    let (mut driver, _) = driver_with(vec![
        VirtualPort::new("usb/0", Some("Twin Stick"), 2, 0, 2),
        VirtualPort::new("usb/1", Some("Twin Stick"), 6, 1, 12),
        VirtualPort::new("usb/2", Some("Other"), 2, 0, 2),
    ]);
    driver.init(&mut Recorder::default()).unwrap();

    assert_eq!(driver.guid(0), driver.guid(1));
    assert_ne!(driver.guid(0), driver.guid(2));
    assert_eq!(driver.guid(0), Some(JoystickGuid::for_name("Twin Stick")));
    assert_eq!(driver.device_name(2), Some("Other"));
}

#[test]
fn update_reports_everything_in_fixed_order() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", Some("HOTAS"), 2, 2, 3)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();

    let c = &controls[0];
    c.set_axis(0, -5);
    c.set_axis(1, 32767);
    c.set_hat(0, 0);
    c.set_hat(1, 8);
    c.set_buttons(0b101);

    let mut rec = Recorder::default();
    driver.update(&mut session, &mut rec);

    assert_eq!(
        rec.kinds(),
        vec![
            InputKind::AxisMoved { axis: 0, value: -5 },
            InputKind::AxisMoved { axis: 1, value: 32767 },
            InputKind::HatChanged { hat: 0, value: HatDirection::Centered },
            InputKind::HatChanged { hat: 1, value: HatDirection::LeftUp },
            InputKind::ButtonPressed { button: 0 },
            InputKind::ButtonReleased { button: 1 },
            InputKind::ButtonPressed { button: 2 },
        ]
    );

    let at = rec.events[0].at;
    assert!(rec.events.iter().all(|e| e.at == at));
    assert!(rec.events.iter().all(|e| e.device.get() == 1));
}

#[test]
fn unchanged_state_is_reported_again() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", None, 1, 1, 2)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();
    controls[0].set_buttons(0b10);

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    driver.update(&mut session, &mut first);
    driver.update(&mut session, &mut second);

    assert_eq!(first.kinds().len(), 4);
    assert_eq!(first.kinds(), second.kinds());
    assert_eq!(controls[0].stats().updates, 2);
}

#[test]
fn update_leaves_identity_alone() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", Some("Pad"), 2, 1, 4)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();
    controls[0].set_buttons(0xffff_ffff);

    driver.update(&mut session, &mut Recorder::default());

    assert_eq!(session.name(), "Pad");
    assert_eq!(session.path(), "usb/0");
    assert_eq!(
        (session.axis_count(), session.hat_count(), session.button_count()),
        (2, 1, 4)
    );
    assert_eq!(driver.device_name(0), Some("Pad"));
}

#[test]
fn open_failure_releases_nothing_twice() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", Some("Flaky"), 1, 0, 1)]);
    driver.init(&mut Recorder::default()).unwrap();
    let before = controls[0].stats();

    controls[0].set_openable(false);
    let err = driver.open(0).unwrap_err();
    assert!(matches!(err, DriverError::UnableToOpen { ref path, .. } if path == "usb/0"));
    assert!(err.to_string().starts_with("unable to open device"));

    let after = controls[0].stats();
    assert_eq!(after, before);
}

#[test]
fn close_is_idempotent() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", None, 1, 0, 1)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();

    driver.close(&mut session);
    driver.close(&mut session);
    drop(session);

    let s = controls[0].stats();
    // One enumeration open during init plus the session.
    assert_eq!((s.opens, s.closes, s.released), (2, 2, 2));
}

#[test]
fn closed_session_reports_nothing() {
    let (mut driver, _) = driver_with(vec![VirtualPort::new("usb/0", None, 3, 0, 3)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();
    driver.close(&mut session);

    let mut rec = Recorder::default();
    driver.update(&mut session, &mut rec);
    assert!(rec.events.is_empty());
}

#[test]
fn quit_twice_leaves_empty_registry() {
    let (mut driver, _) = driver_with(vec![VirtualPort::new("usb/0", None, 0, 0, 0)]);
    driver.quit();
    driver.init(&mut Recorder::default()).unwrap();
    assert_eq!(driver.count(), 1);

    driver.quit();
    driver.quit();
    assert_eq!(driver.count(), 0);
    assert_eq!(driver.device_name(0), None);
    assert_eq!(driver.instance_id(0), None);

    driver.init(&mut Recorder::default()).unwrap();
    assert_eq!(driver.count(), 1);
}

#[test]
fn reinit_rebuilds_instead_of_appending() {
    let (mut driver, _) = driver_with(vec![VirtualPort::new("usb/0", None, 0, 0, 0)]);
    driver.init(&mut Recorder::default()).unwrap();
    driver.api_mut().attach(VirtualPort::new("usb/1", None, 0, 0, 0));
    driver.detect();
    assert_eq!(driver.count(), 1);

    let mut rec = Recorder::default();
    driver.init(&mut rec).unwrap();
    assert_eq!(driver.count(), 2);
    assert_eq!(rec.added, vec![1, 2]);
}

#[test]
fn feature_requests_are_unsupported() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", None, 1, 0, 1)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut s = driver.open(0).unwrap();
    let before = controls[0].stats();

    assert!(driver.rumble(&mut s, 0xffff, 0xffff).unwrap_err().is_unsupported());
    assert!(driver.rumble(&mut s, 0, 0).unwrap_err().is_unsupported());
    assert!(driver.rumble_triggers(&mut s, 1, 2).unwrap_err().is_unsupported());
    assert!(driver.set_led(&mut s, 255, 0, 0).unwrap_err().is_unsupported());
    assert!(driver.send_effect(&mut s, &[]).unwrap_err().is_unsupported());
    assert!(driver.send_effect(&mut s, &[1, 2, 3]).unwrap_err().is_unsupported());
    assert!(driver.set_sensors_enabled(&mut s, true).unwrap_err().is_unsupported());
    assert!(driver.set_sensors_enabled(&mut s, false).unwrap_err().is_unsupported());

    assert_eq!(controls[0].stats(), before);
}

#[test]
fn bus_and_tracker_consume_driver_output() {
    use stickdriver::logger::Logger;
    use stickdriver::{EventFilter, InputEventBus, StateTracker};

    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", Some("Pad"), 1, 0, 2)]);
    let mut bus = InputEventBus::new();
    bus.add_listener(Logger::new(), EventFilter::All, None);
    driver.init(&mut bus).unwrap();

    let mut session = driver.open(0).unwrap();
    let mut tracker = StateTracker::new();

    driver.update(&mut session, &mut tracker);
    assert_eq!(tracker.drain_changes().len(), 3);

    driver.update(&mut session, &mut tracker);
    assert!(tracker.drain_changes().is_empty());

    controls[0].set_buttons(0b10);
    driver.update(&mut session, &mut tracker);
    let changes = tracker.drain_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, InputKind::ButtonPressed { button: 1 });

    let id = session.instance_id();
    assert!(tracker.snapshot().get(id).unwrap().button(1));
}

#[test]
fn buttons_past_the_mask_report_released() {
    let (mut driver, controls) = driver_with(vec![VirtualPort::new("usb/0", None, 0, 0, 40)]);
    driver.init(&mut Recorder::default()).unwrap();
    let mut session = driver.open(0).unwrap();
    assert_eq!(session.button_count(), 40);
    controls[0].set_buttons(u32::MAX);

    let mut rec = Recorder::default();
    driver.update(&mut session, &mut rec);

    let kinds = rec.kinds();
    assert_eq!(kinds.len(), 40);
    assert_eq!(kinds[31], InputKind::ButtonPressed { button: 31 });
    assert!(kinds[32..]
        .iter()
        .all(|k| matches!(k, InputKind::ButtonReleased { button } if *button >= 32)));
}

#[test]
fn change_filter_on_the_bus_sees_only_changes() {
    use std::sync::{Arc, Mutex};
    use stickdriver::{ChangeFilter, EventFilter, InputEventBus, InputListener};

    struct Shared(Arc<Mutex<Vec<InputKind>>>);

    impl InputListener for Shared {
        fn on_input(&mut self, event: &InputEvent) {
            self.0.lock().unwrap().push(event.kind.clone());
        }
    }

    let (mut driver, controls) = driver_with(vec![
        VirtualPort::new("usb/0", Some("Pad"), 1, 0, 2),
        VirtualPort::new("usb/1", Some("Pad"), 1, 0, 2),
    ]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = InputEventBus::new();
    let first = JoystickId::from_slot(0).unwrap();
    bus.add_listener(
        ChangeFilter::new(Shared(seen.clone())).with_axis_threshold(256),
        EventFilter::All,
        Some(first),
    );
    driver.init(&mut bus).unwrap();

    let mut a = driver.open(0).unwrap();
    let mut b = driver.open(1).unwrap();
    let take = || std::mem::take(&mut *seen.lock().unwrap());

    driver.update(&mut a, &mut bus);
    driver.update(&mut b, &mut bus);
    assert_eq!(take().len(), 3);

    for _ in 0..50 {
        driver.update(&mut a, &mut bus);
    }
    assert!(take().is_empty());

    controls[0].set_axis(0, 100);
    controls[1].set_buttons(0b11);
    driver.update(&mut a, &mut bus);
    driver.update(&mut b, &mut bus);
    assert!(take().is_empty());

    controls[0].set_axis(0, 1000);
    controls[0].set_buttons(0b10);
    driver.update(&mut a, &mut bus);
    assert_eq!(
        take(),
        vec![
            InputKind::AxisMoved { axis: 0, value: 1000 },
            InputKind::ButtonPressed { button: 1 },
        ]
    );

    driver.close(&mut a);
    driver.quit();
    driver.init(&mut bus).unwrap();
    let mut a = driver.open(0).unwrap();
    driver.update(&mut a, &mut bus);
    assert_eq!(take().len(), 3);
}
