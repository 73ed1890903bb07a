//! Open/close duty cycle for the vent's timer mode.
//!
//! A single counter `c` runs once per tick:
//!
//! | condition                 | action                  |
//! |---------------------------|-------------------------|
//! | `c <= open`               | vent open               |
//! | `open < c < open + close` | vent closed             |
//! | `c >= open + close`       | `c = 0`, line untouched |
//!
//! and `c` is incremented after the comparison on every tick, including the
//! wrap tick.  The first open phase therefore lasts `open + 1` ticks
//! (`c = 0..=open`) and every later open phase lasts `open` ticks
//! (`c = 1..=open`).  The closed band lasts `close - 1` ticks, and the wrap
//! tick holds whatever level the line already had.  With `close == 1` the
//! band is empty and the line never closes.  This boundary behaviour matches
//! the deployed vent firmware and is kept on purpose.

/// Counter state of the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DutyCycle {
    counter: u32,
}

impl DutyCycle {
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Advance one tick.  Returns the level to write, or `None` on the wrap
    /// tick.
    pub fn step(&mut self, open_ticks: u32, close_ticks: u32) -> Option<bool> {
        let level = if self.counter <= open_ticks {
            Some(true)
        } else if self.counter < open_ticks.saturating_add(close_ticks) {
            Some(false)
        } else {
            self.counter = 0;
            None
        };
        self.counter = self.counter.wrapping_add(1);
        level
    }
}
