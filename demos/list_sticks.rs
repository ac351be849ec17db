//! Lists joysticks as JSON, then prints state changes for a few seconds.
//!
//! ```text
//! RUST_LOG=stickdriver=debug cargo run --example list_sticks [config.toml]
//! ```
//!
//! With no joydev devices present (or off Linux) a virtual stick is used instead.

use std::time::{Duration, Instant};

use stickdriver::backends::virtual_input::{VirtualJoystickApi, VirtualPort};
use stickdriver::logger::Logger;
use stickdriver::{
    DriverConfig, EventFilter, InputEventBus, JoystickDriver, NativeDriver, NativeJoystickApi,
    StateTracker,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };

    #[cfg(all(feature = "joydev", target_os = "linux"))]
    {
        use stickdriver::backends::linux::JoydevApi;
        let mut driver = NativeDriver::new(JoydevApi::new(&config.joydev_dir), config.clone());
        if run(&mut driver)? {
            return Ok(());
        }
    }

    let mut api = VirtualJoystickApi::new();
    let control = api.attach(VirtualPort::new("virtual/0", Some("Virtual Stick"), 2, 1, 8));
    control.set_axis(0, 12000);
    control.set_hat(0, 3);
    control.set_buttons(0b1001);
    let mut driver = NativeDriver::new(api, config);
    run(&mut driver)?;
    Ok(())
}

/// Returns `false` when the backend found nothing.
fn run<A: NativeJoystickApi>(driver: &mut NativeDriver<A>) -> Result<bool, Box<dyn std::error::Error>> {
    let mut bus = InputEventBus::new();
    bus.add_listener(Logger::new(), EventFilter::All, None);
    driver.init(&mut bus)?;

    if driver.count() == 0 {
        driver.quit();
        return Ok(false);
    }
    println!("{}", serde_json::to_string_pretty(&driver.devices())?);

    let mut sessions = Vec::new();
    for slot in 0..driver.count() {
        match driver.open(slot) {
            Ok(s) => sessions.push(s),
            Err(e) => eprintln!("slot {slot}: {e}"),
        }
    }

    let mut tracker = StateTracker::new();
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        for s in sessions.iter_mut() {
            driver.update(s, &mut tracker);
        }
        for ev in tracker.drain_changes() {
            println!("{}: {:?}", ev.device, ev.kind);
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    for s in sessions.iter_mut() {
        driver.close(s);
    }
    driver.quit();
    Ok(true)
}
