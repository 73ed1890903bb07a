//! Fixed phase sequence for the traffic light's normal mode.
//!
//! The cycle is six ticks long and driven by an explicit table:
//!
//! | phase | step          | lamps after the tick                     |
//! |-------|---------------|------------------------------------------|
//! | 0     | `Show(GREEN)` | green                                    |
//! | 1, 2  | `Hold`        | unchanged                                |
//! | 3     | `Show(YELLOW)`| yellow                                   |
//! | 4     | `StopOrCross` | red, plus yellow if a pedestrian waits   |
//! | 5     | `Hold`        | unchanged                                |
//!
//! A pending pedestrian call seen at phase 4 starts a crossing: red and
//! yellow stay lit for [`CROSSING_TICKS`] further ticks while the phase
//! index is frozen.  On the last crossing tick the call is cleared and the
//! sequence restarts at phase 0.

use log::debug;

/// Number of ticks red+yellow is held for a pedestrian crossing.
pub const CROSSING_TICKS: u8 = 4;

/// Lamp identity on the traffic-light board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lamp {
    Red,
    Yellow,
    Green,
}

/// Levels of the three lamp lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lamps {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl Lamps {
    pub const DARK: Self = Self::only(None);
    pub const GREEN: Self = Self::only(Some(Lamp::Green));
    pub const YELLOW: Self = Self::only(Some(Lamp::Yellow));
    pub const RED: Self = Self::only(Some(Lamp::Red));

    const fn only(lamp: Option<Lamp>) -> Self {
        Self {
            red: matches!(lamp, Some(Lamp::Red)),
            yellow: matches!(lamp, Some(Lamp::Yellow)),
            green: matches!(lamp, Some(Lamp::Green)),
        }
    }

    pub fn get(&self, lamp: Lamp) -> bool {
        match lamp {
            Lamp::Red => self.red,
            Lamp::Yellow => self.yellow,
            Lamp::Green => self.green,
        }
    }

    pub fn set(&mut self, lamp: Lamp, on: bool) {
        match lamp {
            Lamp::Red => self.red = on,
            Lamp::Yellow => self.yellow = on,
            Lamp::Green => self.green = on,
        }
    }
}

/// One row of the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// Drive exactly these lamp levels.
    Show(Lamps),
    /// Leave every lamp as it is.
    Hold,
    /// Red on; yellow mirrors the pedestrian call and a pending call
    /// starts a crossing.
    StopOrCross,
}

pub const PHASE_COUNT: u8 = 6;

pub const PHASE_TABLE: [PhaseStep; PHASE_COUNT as usize] = [
    PhaseStep::Show(Lamps::GREEN),
    PhaseStep::Hold,
    PhaseStep::Hold,
    PhaseStep::Show(Lamps::YELLOW),
    PhaseStep::StopOrCross,
    PhaseStep::Hold,
];

/// Phase index, pedestrian latch, and crossing countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseSequence {
    phase: u8,
    call_pending: bool,
    /// `Some(n)` while crossing; `n` counts 0..CROSSING_TICKS-1.
    crossing: Option<u8>,
}

impl PhaseSequence {
    pub const fn new() -> Self {
        Self {
            phase: 0,
            call_pending: false,
            crossing: None,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn call_pending(&self) -> bool {
        self.call_pending
    }

    pub fn is_crossing(&self) -> bool {
        self.crossing.is_some()
    }

    pub fn crossing_counter(&self) -> Option<u8> {
        self.crossing
    }

    /// Restart at phase 0 and abandon any crossing in progress.
    /// A pending call is kept and served at the next phase 4.
    pub fn restart(&mut self) {
        self.phase = 0;
        self.crossing = None;
    }

    /// Latch a pedestrian call.  Returns `false` if one was already
    /// pending.
    pub fn set_call(&mut self) -> bool {
        let fresh = !self.call_pending;
        self.call_pending = true;
        fresh
    }

    /// Advance one tick, updating `lamps` in place.
    pub fn step(&mut self, lamps: &mut Lamps) {
        if let Some(counter) = self.crossing {
            if counter + 1 < CROSSING_TICKS {
                self.crossing = Some(counter + 1);
            } else {
                debug!("phase: crossing complete");
                self.call_pending = false;
                self.crossing = None;
                self.phase = 0;
            }
            return;
        }

        match PHASE_TABLE[usize::from(self.phase)] {
            PhaseStep::Show(levels) => *lamps = levels,
            PhaseStep::Hold => {}
            PhaseStep::StopOrCross => {
                lamps.green = false;
                lamps.red = true;
                lamps.yellow = self.call_pending;
                if self.call_pending {
                    debug!("phase: pedestrian crossing");
                    self.crossing = Some(0);
                }
            }
        }
        self.phase = (self.phase + 1) % PHASE_COUNT;
    }
}
