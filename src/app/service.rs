//! Controller service: the hexagonal core.
//!
//! [`Controller`] owns the mode machine, the per-mode sub-state, the press
//! queue and the live tunables.  Every method takes `&self`, so one
//! controller can be shared between the tick context, the edge interrupt
//! handlers and status callers.
//!
//! ```text
//!  EdgeSource ──on_edge──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                          │        Controller         │
//!  TickTimer ────tick────▶ │  EdgeQueue · Fsm · ctx    │ ──▶ LinePort
//!                          │  SharedTunables           │
//!  status / write ───────▶ └──────────────────────────┘
//! ```
//!
//! Mode and sub-state sit together behind one critical-section mutex.
//! Presses are queued by the interrupt half and applied by the tick, in
//! arrival order, before the controller step runs.  Tunables are single
//! atomic words and need no lock.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, error, info, warn};

use crate::config::{SharedTunables, Tunable, Tunables};
use crate::error::{Error, PortError, Result};
use crate::events::{Button, EDGE_QUEUE_CAP, EdgeQueue};
use crate::fsm::{Fsm, ModeId};
use crate::pins::BUTTON_DEBOUNCE_MS;
use crate::status::{self, StatusReader, StatusText};

use super::events::ControlEvent;
use super::ports::{EdgeSource, EventSink, LineMode, LinePort, Pin, TickTimer};
use super::variant::{MAX_LINES, PressOutcome, Snapshot, Variant};

/// Upper bound on events produced by one tick: every queued press plus one
/// change per tunable.
const MAX_TICK_EVENTS: usize = EDGE_QUEUE_CAP + Tunable::ALL.len();

// ───────────────────────────────────────────────────────────────
// Locked state
// ───────────────────────────────────────────────────────────────

struct Core<V: Variant> {
    fsm: Fsm<V::Mode, V::Context>,
    ctx: V::Context,
    /// Tunables the last tick ran with.
    applied: Tunables,
}

impl<V: Variant> Core<V> {
    fn new(tunables: Tunables) -> Self {
        Self {
            fsm: Fsm::new(V::modes(), V::INITIAL_MODE),
            ctx: V::new_context(tunables),
            applied: tunables,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<V: Variant> {
    core: Mutex<CriticalSectionRawMutex, RefCell<Core<V>>>,
    presses: EdgeQueue,
    tunables: SharedTunables,
    running: AtomicBool,
}

impl<V: Variant> Controller<V> {
    /// Build a stopped controller.  Nothing touches hardware until
    /// [`start`](Self::start).
    pub fn new(initial: Tunables) -> Self {
        Self {
            core: Mutex::new(RefCell::new(Core::new(initial))),
            presses: EdgeQueue::new(),
            tunables: SharedTunables::new(initial),
            running: AtomicBool::new(false),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Acquire every line and edge source, enter the initial mode and arm
    /// the first tick.
    ///
    /// Acquisition order is outputs (driven low), inputs, then buttons.  On
    /// any failure everything already acquired is released in reverse
    /// order, no tick is armed, and the error is returned.
    pub fn start(
        &self,
        port: &mut impl LinePort,
        edges: &mut impl EdgeSource,
        timer: &mut impl TickTimer,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        if let Err(e) = Self::acquire(port, edges) {
            error!("{} startup failed: {}", V::NAME, e);
            return Err(e.into());
        }

        let tunables = self.tunables.snapshot();
        let mode = self.core.lock(|cell| {
            let mut core = cell.borrow_mut();
            *core = Core::new(tunables);
            let core = &mut *core;
            core.fsm.start(&mut core.ctx);
            core.fsm.current_mode()
        });

        self.presses.clear();
        self.running.store(true, Ordering::Release);
        timer.arm(tunables.tick_period());

        info!(
            "{} started in {} at {} Hz",
            V::NAME,
            mode.name(),
            tunables.rate_hz
        );
        sink.emit(&ControlEvent::Started {
            variant: V::NAME,
            mode: mode.name(),
        });
        Ok(())
    }

    /// Stop ticking, detach both buttons, drive outputs low and release
    /// every line.  A no-op if the controller is not running.
    ///
    /// Must not race a [`tick`](Self::tick) in progress; the timer adapter
    /// guarantees that by cancelling synchronously.
    pub fn stop(
        &self,
        port: &mut impl LinePort,
        edges: &mut impl EdgeSource,
        timer: &mut impl TickTimer,
        sink: &mut impl EventSink,
    ) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        timer.cancel();
        for &button in Button::ALL.iter().rev() {
            edges.detach(button);
        }
        self.presses.clear();
        Self::release_lines(port, V::OUTPUTS, V::INPUTS);

        info!("{} stopped", V::NAME);
        sink.emit(&ControlEvent::Stopped);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    // ── Interrupt half ────────────────────────────────────────

    /// Record a debounced press.  Safe to call from interrupt context:
    /// it only enqueues, never locks controller state and never logs.
    ///
    /// Presses arriving while the controller is stopped are ignored.
    pub fn on_edge(&self, button: Button) {
        if self.is_running() {
            self.presses.push(button);
        }
    }

    // ── Tick ──────────────────────────────────────────────────

    /// Run one control period:
    ///
    /// 1. sample inputs
    /// 2. apply queued presses (mode switches with entry reset, latches)
    /// 3. run the current mode's controller step
    /// 4. write outputs
    /// 5. re-arm the timer for `1 / rate`
    ///
    /// Returns without touching anything once the controller is stopped.
    pub fn tick(
        &self,
        port: &mut impl LinePort,
        timer: &mut impl TickTimer,
        sink: &mut impl EventSink,
    ) {
        if !self.is_running() {
            return;
        }

        let tunables = self.tunables.snapshot();

        let mut inputs = [false; MAX_LINES];
        for (level, &pin) in inputs.iter_mut().zip(V::INPUTS) {
            *level = port.read_level(pin);
        }
        let n_in = V::INPUTS.len().min(MAX_LINES);
        let n_out = V::OUTPUTS.len().min(MAX_LINES);

        let mut outputs = [false; MAX_LINES];
        let mut events: heapless::Vec<ControlEvent, MAX_TICK_EVENTS> = heapless::Vec::new();

        self.core.lock(|cell| {
            let mut core = cell.borrow_mut();
            let core = &mut *core;

            self.presses.drain(|button| {
                let event = Self::apply_press(core, button);
                if events.push(event).is_err() {
                    debug!("tick event buffer full");
                }
            });

            for which in Tunable::ALL {
                let value = tunables.get(which);
                if value != core.applied.get(which) {
                    if events.push(ControlEvent::TunableChanged { which, value }).is_err() {
                        debug!("tick event buffer full");
                    }
                }
            }
            core.applied = tunables;
            V::set_tunables(&mut core.ctx, tunables);

            V::latch_inputs(&mut core.ctx, &inputs[..n_in]);
            core.fsm.tick(&mut core.ctx);
            V::output_levels(&core.ctx, &mut outputs[..n_out]);
        });

        for (&pin, &level) in V::OUTPUTS.iter().zip(&outputs) {
            port.write_level(pin, level);
        }

        for event in &events {
            sink.emit(event);
        }

        if self.is_running() {
            timer.arm(tunables.tick_period());
        }
    }

    // ── Status / config surface ───────────────────────────────

    /// Consistent copy of the controller state, taken in one lock.
    pub fn snapshot(&self) -> Snapshot<V> {
        let (mode, ticks_in_mode, context) = self.core.lock(|cell| {
            let core = cell.borrow();
            (core.fsm.current_mode(), core.fsm.ticks_in_mode(), core.ctx.clone())
        });
        Snapshot {
            mode,
            ticks_in_mode,
            context,
            tunables: self.tunables.snapshot(),
            dropped_presses: self.presses.dropped(),
            running: self.is_running(),
        }
    }

    /// Render the status text from a fresh snapshot.  The lock is held only
    /// while copying, never while formatting.
    pub fn status(&self) -> StatusText {
        let snap = self.snapshot();
        status::render(|out| V::render_status(&snap, out))
    }

    /// Start a character-device style read session.  The snapshot is
    /// taken here, once; the returned reader serves every offset from it.
    pub fn open_status(&self) -> StatusReader {
        StatusReader::new(self.status())
    }

    /// Character-device style write.  Always consumes the whole input and
    /// reports its length, whether or not it named a valid command.
    pub fn write_command(&self, input: &[u8]) -> usize {
        let _ = self.apply_command(input);
        input.len()
    }

    /// Apply one config write and report what it changed.
    ///
    /// Input that is not a known, in-domain `<name> <integer>` command for
    /// this variant is ignored and `None` is returned.  On success the
    /// tunable takes effect from the next tick.
    pub fn apply_command(&self, input: &[u8]) -> Option<(Tunable, u32)> {
        match status::parse_command(input, V::TUNABLES, V::BARE_VALUE) {
            Some((which, value)) => {
                self.tunables.set(which, value);
                debug!("{} <- {}", which.name(), value);
                Some((which, value))
            }
            None => {
                debug!("ignored config write ({} bytes)", input.len());
                None
            }
        }
    }

    /// Direct tunable update for in-process callers.  Returns `false` if
    /// the value is outside the tunable's domain or the variant does not
    /// expose it.
    pub fn set_tunable(&self, which: Tunable, value: u32) -> bool {
        V::TUNABLES.contains(&which) && self.tunables.set(which, value)
    }

    pub fn tunables(&self) -> Tunables {
        self.tunables.snapshot()
    }

    pub fn current_mode(&self) -> V::Mode {
        self.core.lock(|cell| cell.borrow().fsm.current_mode())
    }

    /// Presses lost to a full queue since construction.
    pub fn dropped_presses(&self) -> u32 {
        self.presses.dropped()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_press(core: &mut Core<V>, button: Button) -> ControlEvent {
        let mode = core.fsm.current_mode();
        match V::on_press(button, mode, &mut core.ctx) {
            PressOutcome::SwitchTo(next) => match core.fsm.set_mode(next, &mut core.ctx) {
                Some(from) => ControlEvent::ModeChanged {
                    from: from.name(),
                    to: next.name(),
                },
                None => ControlEvent::PressIgnored(button),
            },
            PressOutcome::Latched => ControlEvent::CallLatched,
            PressOutcome::Ignored => ControlEvent::PressIgnored(button),
        }
    }

    fn acquire(
        port: &mut impl LinePort,
        edges: &mut impl EdgeSource,
    ) -> core::result::Result<(), PortError> {
        for (i, &pin) in V::OUTPUTS.iter().enumerate() {
            if let Err(e) = port.claim(pin, LineMode::Output) {
                warn!("claim of output GPIO {} failed, rolling back", pin);
                Self::release_lines(port, &V::OUTPUTS[..i], &[]);
                return Err(e);
            }
            port.write_level(pin, false);
        }

        for (i, &pin) in V::INPUTS.iter().enumerate() {
            if let Err(e) = port.claim(pin, LineMode::Input) {
                warn!("claim of input GPIO {} failed, rolling back", pin);
                Self::release_lines(port, V::OUTPUTS, &V::INPUTS[..i]);
                return Err(e);
            }
        }

        for (i, &button) in Button::ALL.iter().enumerate() {
            if let Err(e) = edges.attach(button, button.gpio(), BUTTON_DEBOUNCE_MS) {
                warn!("attach of {:?} failed, rolling back", button);
                for &attached in Button::ALL[..i].iter().rev() {
                    edges.detach(attached);
                }
                Self::release_lines(port, V::OUTPUTS, V::INPUTS);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Release `inputs` then `outputs`, each in reverse claim order.
    /// Outputs are driven low first.
    fn release_lines(port: &mut impl LinePort, outputs: &[Pin], inputs: &[Pin]) {
        for &pin in inputs.iter().rev() {
            port.release(pin);
        }
        for &pin in outputs.iter().rev() {
            port.write_level(pin, false);
            port.release(pin);
        }
        debug!(
            "{} released {} output(s), {} input(s)",
            V::NAME,
            outputs.len(),
            inputs.len()
        );
    }
}

impl<V: Variant> Default for Controller<V> {
    fn default() -> Self {
        Self::new(Tunables::default())
    }
}
