//! Port traits: the hexagonal boundary between the controller and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (GPIO lines, edge interrupts, the tick timer, event
//! sinks) implement these traits.  The [`Controller`](super::service::Controller)
//! takes them as generic arguments at each call, so the domain core never
//! touches hardware directly and runs unchanged against the mocks in
//! `tests/integration/mock_hw.rs`.

use core::time::Duration;

use crate::error::PortError;
use crate::events::Button;

use super::events::ControlEvent;

/// Board GPIO number.
pub type Pin = u32;

/// Direction a line is claimed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    Input,
    Output,
}

// ───────────────────────────────────────────────────────────────
// Line port (sensor inputs and actuator outputs)
// ───────────────────────────────────────────────────────────────

/// Digital line access.
///
/// `claim` / `release` bracket the controller's lifetime; `read_level` and
/// `write_level` are called from the tick context only and must not block.
pub trait LinePort {
    /// Acquire `pin` in the given direction.  Output lines are driven low
    /// by the controller right after a successful claim.
    fn claim(&mut self, pin: Pin, mode: LineMode) -> Result<(), PortError>;

    /// Give a previously claimed line back.  Never fails.
    fn release(&mut self, pin: Pin);

    /// Sample an input line.  `true` = HIGH.
    fn read_level(&mut self, pin: Pin) -> bool;

    /// Drive an output line.  Writing the current level again is allowed.
    fn write_level(&mut self, pin: Pin, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Edge source (debounced button interrupts)
// ───────────────────────────────────────────────────────────────

/// Debounced rising-edge notifications.
///
/// After a successful `attach` the adapter calls
/// [`Controller::on_edge`](super::service::Controller::on_edge) from
/// interrupt context for every debounced press of `button`.  After
/// `detach` returns no further callbacks for that button may start.
pub trait EdgeSource {
    fn attach(&mut self, button: Button, pin: Pin, debounce_ms: u32) -> Result<(), PortError>;

    fn detach(&mut self, button: Button);
}

// ───────────────────────────────────────────────────────────────
// Tick timer
// ───────────────────────────────────────────────────────────────

/// One-shot timer that triggers the next
/// [`Controller::tick`](super::service::Controller::tick).
///
/// The controller re-arms it at the end of every tick, so a changed rate
/// takes effect from the next period on.
pub trait TickTimer {
    fn arm(&mut self, period: Duration);

    /// Cancel a pending expiry.  No tick may start after this returns.
    fn cancel(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`ControlEvent`]s through this port.
/// Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &ControlEvent);
}
