//! Actuator controller firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  EspGpio (LinePort)   EspButtons (EdgeSource)            │
//! │  EspTickTimer (TickTimer)   LogEventSink (EventSink)     │
//! │  console (stdin lines -> config writes / status reads)   │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │          Controller<Board> (pure logic)            │  │
//! │  │   EdgeQueue · Fsm · per-mode controllers           │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The board is the CO2 vent by default; build with `--features traffic`
//! for the traffic light.
#![deny(unused_must_use)]

use std::io;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use actuator_core::Controller;
use actuator_core::adapters::console;
use actuator_core::adapters::hardware::{EspButtons, EspGpio};
use actuator_core::adapters::log_sink::LogEventSink;
use actuator_core::config::Tunables;
use actuator_core::drivers::hw_timer::EspTickTimer;

#[cfg(not(feature = "traffic"))]
type Board = actuator_core::fsm::vent::Vent;
#[cfg(feature = "traffic")]
type Board = actuator_core::fsm::traffic::Traffic;

/// How often the main loop checks for expired ticks and pending presses.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Log the status text every this many ticks.
const STATUS_LOG_EVERY: u32 = 30;

/// Stack for the console thread.
const CONSOLE_STACK_KB: usize = 6;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  actuator-core v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Controller + adapters ──────────────────────────────
    // Leaked so edge dispatch and the tick share one `&'static` owner.
    let controller: &'static Controller<Board> =
        Box::leak(Box::new(Controller::new(Tunables::default())));

    let mut gpio = EspGpio::new();
    let mut buttons = EspButtons::new();
    let mut timer = EspTickTimer::new()?;
    let mut sink = LogEventSink::new();

    // ── 3. Start (fail closed) ────────────────────────────────
    controller.start(&mut gpio, &mut buttons, &mut timer, &mut sink)?;
    for line in controller.status().lines() {
        info!("{}", line);
    }

    // ── 4. Console ────────────────────────────────────────────
    thread::Builder::new()
        .name("console".into())
        .stack_size(CONSOLE_STACK_KB * 1024)
        .spawn(move || {
            if let Err(e) = console::run(controller, io::stdin().lock(), io::stdout()) {
                warn!("console: stopped: {}", e);
            }
        })?;

    // ── 5. Main loop ──────────────────────────────────────────
    let mut ticks: u32 = 0;
    loop {
        buttons.dispatch(controller);

        if timer.take_pending() {
            controller.tick(&mut gpio, &mut timer, &mut sink);
            ticks = ticks.wrapping_add(1);
            if ticks % STATUS_LOG_EVERY == 0 {
                for line in controller.status().lines() {
                    log::debug!("{}", line);
                }
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}
