//! Single-lamp flasher for the traffic light's flashing modes.

use super::phase::{Lamp, Lamps};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flasher {
    on: bool,
}

impl Flasher {
    pub const fn new() -> Self {
        Self { on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn reset(&mut self) {
        self.on = false;
    }

    /// Drive `lamp` to the current toggle level, force the other two off,
    /// then flip the toggle.
    pub fn step(&mut self, lamp: Lamp, lamps: &mut Lamps) {
        *lamps = Lamps::DARK;
        lamps.set(lamp, self.on);
        self.on = !self.on;
    }
}
