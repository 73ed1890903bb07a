//! Presses and status reads racing the tick path.
//!
//! The tick runs on the test thread with the mock rig; an edge thread
//! hammers both buttons and a reader thread renders status text the whole
//! time.  Every status text must describe exactly one mode.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use actuator_core::Controller;
use actuator_core::events::Button;
use actuator_core::fsm::traffic::Traffic;
use actuator_core::fsm::vent::{Vent, VentMode};

use super::mock_hw::Rig;

fn line<'a>(status: &'a str, prefix: &str) -> Option<&'a str> {
    status.lines().find_map(|l| l.strip_prefix(prefix))
}

fn check_traffic_status(status: &str) {
    let mode = line(status, "Mode: ").expect("mode line");
    let red = line(status, "Red: ").expect("red line");
    let yellow = line(status, "Yellow: ").expect("yellow line");
    let green = line(status, "Green: ").expect("green line");
    let flash = line(status, "Flash: ");
    let in_sequence = line(status, "Phase: ").or(line(status, "Crossing: "));

    match mode {
        "normal" => {
            assert!(flash.is_none(), "{status}");
            assert!(in_sequence.is_some(), "{status}");
        }
        "flashing-red" => {
            assert!(flash.is_some() && in_sequence.is_none(), "{status}");
            assert_eq!((yellow, green), ("off", "off"), "{status}");
        }
        "flashing-yellow" => {
            assert!(flash.is_some() && in_sequence.is_none(), "{status}");
            assert_eq!((red, green), ("off", "off"), "{status}");
        }
        other => panic!("unknown mode {other:?}"),
    }
}

#[test]
fn traffic_status_never_mixes_modes() {
    let c = Controller::<Traffic>::default();
    let mut rig = Rig::new();
    rig.start(&c).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut i = 0u32;
            while !done.load(Ordering::Relaxed) {
                let button = if i % 3 == 0 {
                    Button::Secondary
                } else {
                    Button::Primary
                };
                c.on_edge(button);
                i = i.wrapping_add(1);
                thread::yield_now();
            }
        });

        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                check_traffic_status(&c.status());
            }
        });

        for _ in 0..2_000 {
            rig.tick(&c);
            check_traffic_status(&c.status());
        }
        done.store(true, Ordering::Relaxed);
    });

    assert!(c.is_running());
}

#[test]
fn vent_manual_always_shows_open_servo() {
    let c = Controller::<Vent>::default();
    let mut rig = Rig::new();
    rig.start(&c).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                c.on_edge(Button::Secondary);
                c.on_edge(Button::Primary);
                thread::yield_now();
            }
        });

        for _ in 0..2_000 {
            rig.tick(&c);
            let snap = c.snapshot();
            if snap.mode == VentMode::Manual {
                assert!(snap.context.servo_open);
            }
        }
        done.store(true, Ordering::Relaxed);
    });
}
