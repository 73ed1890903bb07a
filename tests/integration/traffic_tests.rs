//! Traffic light end-to-end: phase sequence, pedestrian crossing, flashing
//! modes and the rate command.

use std::time::Duration;

use actuator_core::Controller;
use actuator_core::app::events::ControlEvent;
use actuator_core::config::{Tunable, Tunables};
use actuator_core::control::phase::Lamps;
use actuator_core::events::Button;
use actuator_core::fsm::traffic::{LightMode, Traffic};
use actuator_core::pins::{GREEN_LAMP_GPIO, RED_LAMP_GPIO, YELLOW_LAMP_GPIO};

use super::mock_hw::Rig;

fn started() -> (Controller<Traffic>, Rig) {
    let c = Controller::<Traffic>::new(Tunables::default());
    let mut rig = Rig::new();
    rig.start(&c).unwrap();
    (c, rig)
}

/// Lamp levels as last written to the output lines.
fn lamps(rig: &Rig) -> Lamps {
    Lamps {
        red: rig.lines.level(RED_LAMP_GPIO),
        yellow: rig.lines.level(YELLOW_LAMP_GPIO),
        green: rig.lines.level(GREEN_LAMP_GPIO),
    }
}

const RED_YELLOW: Lamps = Lamps {
    red: true,
    yellow: true,
    green: false,
};

// ── Normal mode ───────────────────────────────────────────────

#[test]
fn normal_cycle_repeats_every_six_ticks() {
    let (c, mut rig) = started();
    let seen = rig.run(&c, 18, |rig, _| lamps(rig));

    let period = [
        Lamps::GREEN,
        Lamps::GREEN,
        Lamps::GREEN,
        Lamps::YELLOW,
        Lamps::RED,
        Lamps::RED,
    ];
    for (tick, l) in seen.iter().enumerate() {
        assert_eq!(*l, period[tick % 6], "tick {tick}");
    }
}

#[test]
fn pedestrian_call_holds_red_yellow_then_clears() {
    let (c, mut rig) = started();
    c.on_edge(Button::Secondary);

    let seen = rig.run(&c, 11, |rig, c| (lamps(rig), c.snapshot().context.sequence.call_pending()));

    assert_eq!(seen[0], (Lamps::GREEN, true));
    assert_eq!(seen[3].0, Lamps::YELLOW);
    for tick in 4..=7 {
        assert_eq!(seen[tick], (RED_YELLOW, true), "tick {tick}");
    }
    // Last crossing tick: lamps unchanged, call served.
    assert_eq!(seen[8], (RED_YELLOW, false));
    assert_eq!(seen[9], (Lamps::GREEN, false));
    assert_eq!(seen[10], (Lamps::GREEN, false));

    assert!(rig.sink.events.contains(&ControlEvent::CallLatched));
}

#[test]
fn call_during_red_waits_for_next_cycle() {
    let (c, mut rig) = started();
    rig.run(&c, 5, |_, _| ());
    assert_eq!(lamps(&rig), Lamps::RED);

    c.on_edge(Button::Secondary);
    let seen = rig.run(&c, 6, |rig, _| lamps(rig));
    // Phase 5 then a full green/yellow before the crossing starts.
    assert_eq!(seen[0], Lamps::RED);
    assert_eq!(seen[1], Lamps::GREEN);
    assert_eq!(seen[4], Lamps::YELLOW);
    assert_eq!(seen[5], RED_YELLOW);
}

#[test]
fn repeated_call_is_latched_once() {
    let (c, mut rig) = started();
    c.on_edge(Button::Secondary);
    c.on_edge(Button::Secondary);
    rig.tick(&c);
    let latched = rig
        .sink
        .events
        .iter()
        .filter(|e| **e == ControlEvent::CallLatched)
        .count();
    assert_eq!(latched, 1);
    assert!(
        rig.sink
            .events
            .contains(&ControlEvent::PressIgnored(Button::Secondary))
    );
}

#[test]
fn status_reports_crossing_counter() {
    let (c, mut rig) = started();
    c.on_edge(Button::Secondary);
    rig.run(&c, 6, |_, _| ());
    let status = c.status();
    assert!(status.starts_with("Mode: normal\nCycle rate: 1 Hz\n"));
    assert!(status.contains("Red: on\nYellow: on\nGreen: off\n"));
    assert!(status.contains("Pedestrian present: yes\n"));
    assert!(status.contains("Crossing: 1\n"));
}

#[test]
fn chunked_read_stays_on_one_snapshot() {
    let (c, mut rig) = started();
    rig.tick(&c);
    let reader = c.open_status();

    let mut text = Vec::new();
    let mut buf = [0u8; 16];
    let mut offset = reader.read(0, &mut buf);
    text.extend_from_slice(&buf[..offset]);

    // Mode switch lands between two reads of the same session.
    c.on_edge(Button::Primary);
    rig.tick(&c);
    assert_eq!(c.current_mode(), LightMode::FlashRed);

    loop {
        let n = reader.read(offset, &mut buf);
        if n == 0 {
            break;
        }
        text.extend_from_slice(&buf[..n]);
        offset += n;
    }
    let text = String::from_utf8(text).unwrap();
    assert!(text.starts_with("Mode: normal\nCycle rate: 1 Hz\n"));
    assert!(text.contains("Phase: 1\n"));
    assert!(!text.contains("Flash:"));

    // A new session sees the new mode.
    assert!(c.open_status().as_str().starts_with("Mode: flashing-red\n"));
}

// ── Flashing modes ────────────────────────────────────────────

#[test]
fn primary_cycles_modes_and_flash_darkens_other_lamps() {
    let (c, mut rig) = started();
    rig.tick(&c);
    assert_eq!(lamps(&rig), Lamps::GREEN);

    c.on_edge(Button::Primary);
    let red = rig.run(&c, 4, |rig, _| lamps(rig));
    assert_eq!(c.current_mode(), LightMode::FlashRed);
    assert_eq!(red, [Lamps::DARK, Lamps::RED, Lamps::DARK, Lamps::RED]);

    c.on_edge(Button::Primary);
    let yellow = rig.run(&c, 4, |rig, _| lamps(rig));
    assert_eq!(c.current_mode(), LightMode::FlashYellow);
    assert_eq!(
        yellow,
        [Lamps::DARK, Lamps::YELLOW, Lamps::DARK, Lamps::YELLOW]
    );

    c.on_edge(Button::Primary);
    rig.tick(&c);
    assert_eq!(c.current_mode(), LightMode::Normal);
    assert_eq!(lamps(&rig), Lamps::GREEN);
}

#[test]
fn secondary_ignored_while_flashing() {
    let (c, mut rig) = started();
    c.on_edge(Button::Primary);
    rig.tick(&c);
    c.on_edge(Button::Secondary);
    rig.tick(&c);

    assert_eq!(
        rig.sink.events.last(),
        Some(&ControlEvent::PressIgnored(Button::Secondary))
    );
    assert!(!c.snapshot().context.sequence.call_pending());
    assert!(c.status().contains("Pedestrian present: no\n"));

    // Back in Normal the cycle runs without a crossing.
    c.on_edge(Button::Primary);
    c.on_edge(Button::Primary);
    let seen = rig.run(&c, 6, |rig, _| lamps(rig));
    assert_eq!(seen[4], Lamps::RED);
}

#[test]
fn status_in_flash_mode_shows_toggle() {
    let (c, mut rig) = started();
    c.on_edge(Button::Primary);
    rig.run(&c, 2, |_, _| ());
    let status = c.status();
    assert!(status.starts_with("Mode: flashing-red\n"));
    assert!(status.contains("Red: on\nYellow: off\nGreen: off\n"));
    assert!(status.contains("Flash: off\n"));
}

// ── Rate ──────────────────────────────────────────────────────

#[test]
fn bare_integer_sets_rate_and_rearms() {
    let (c, mut rig) = started();
    assert_eq!(c.apply_command(b"3"), Some((Tunable::Rate, 3)));
    rig.tick(&c);
    assert_eq!(rig.timer.armed, Some(Duration::from_secs(1) / 3));
    assert!(c.status().contains("Cycle rate: 3 Hz\n"));
}

#[test]
fn named_rate_and_out_of_range_values() {
    let (c, _rig) = started();
    assert_eq!(c.apply_command(b"rate 9"), Some((Tunable::Rate, 9)));
    assert_eq!(c.apply_command(b"10"), None);
    assert_eq!(c.apply_command(b"0"), None);
    assert_eq!(c.tunables().rate_hz, 9);
}

#[test]
fn vent_tunables_rejected() {
    let (c, _rig) = started();
    let before = c.tunables();
    assert_eq!(c.apply_command(b"co2time 5"), None);
    assert!(!c.set_tunable(Tunable::TimerOpen, 3));
    assert_eq!(c.tunables(), before);
}
