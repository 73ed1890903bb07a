//! Threshold-hysteresis controller for the CO2 vent.
//!
//! ```text
//!  WAITING ──[sensor high]──▶ ENGAGING ──[counter ≥ open]──▶ COOLDOWN
//!     ▲                                                          │
//!     └──────────────────[counter ≥ cooldown]────────────────────┘
//! ```
//!
//! The sensor is ignored during COOLDOWN so a reading oscillating around
//! the threshold cannot re-trigger the vent immediately.  Both durations are
//! tick counts.

use log::debug;

/// Sub-states of the automatic controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AutoPhase {
    #[default]
    Waiting = 0,
    Engaging = 1,
    Cooldown = 2,
}

impl AutoPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Engaging => "engaging",
            Self::Cooldown => "cooldown",
        }
    }
}

/// Sub-state plus the elapsed-tick counter for the current sub-state.
///
/// The counter is reset to 0 on every sub-state change and never exceeds
/// the duration configured for the current sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutomaticState {
    phase: AutoPhase,
    counter: u32,
}

impl AutomaticState {
    pub const fn new() -> Self {
        Self {
            phase: AutoPhase::Waiting,
            counter: 0,
        }
    }

    pub fn phase(&self) -> AutoPhase {
        self.phase
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Back to `(Waiting, 0)`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one tick.
    ///
    /// Returns `Some(level)` when the actuator line must be written this
    /// tick, `None` when it keeps its previous level.
    pub fn step(&mut self, sensor_high: bool, open_ticks: u32, cooldown_ticks: u32) -> Option<bool> {
        match self.phase {
            AutoPhase::Waiting => {
                if sensor_high {
                    self.enter(AutoPhase::Engaging);
                    Some(true)
                } else {
                    Some(false)
                }
            }

            AutoPhase::Engaging => {
                if self.counter >= open_ticks {
                    self.enter(AutoPhase::Cooldown);
                    Some(false)
                } else {
                    self.counter += 1;
                    None
                }
            }

            AutoPhase::Cooldown => {
                if self.counter >= cooldown_ticks {
                    self.enter(AutoPhase::Waiting);
                } else {
                    self.counter += 1;
                }
                None
            }
        }
    }

    fn enter(&mut self, next: AutoPhase) {
        debug!("automatic: {} -> {}", self.phase.name(), next.name());
        self.phase = next;
        self.counter = 0;
    }
}
