//! [`LinePort`] over `embedded-hal` digital pins.
//!
//! Each board line is registered once with its pin driver; `claim` then only
//! hands out ownership.  Works with any HAL whose pin drivers implement the
//! `embedded-hal` 1.0 `InputPin` / `OutputPin` traits.
//!
//! Library-only: the ESP32 binary drives GPIO through `hardware::EspGpio`.
//! This adapter is for hosts that already hold typed pin drivers, e.g. a
//! bare-metal HAL or a test harness.

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::{LineMode, LinePort, Pin};
use crate::app::variant::MAX_LINES;
use crate::error::PortError;

/// Driver return code reported for a line that was never registered.
pub const RC_NO_SUCH_LINE: i32 = -19;

struct Line<P> {
    pin: Pin,
    driver: P,
    claimed: bool,
}

/// Registered input and output lines.
pub struct HalLines<I, O> {
    inputs: Vec<Line<I>, MAX_LINES>,
    outputs: Vec<Line<O>, MAX_LINES>,
}

impl<I: InputPin, O: OutputPin> HalLines<I, O> {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Register an input line.  Lines beyond capacity are dropped with a
    /// warning and later fail to claim.
    pub fn with_input(mut self, pin: Pin, driver: I) -> Self {
        let line = Line {
            pin,
            driver,
            claimed: false,
        };
        if self.inputs.push(line).is_err() {
            warn!("hal_port: no room for input GPIO {}", pin);
        }
        self
    }

    pub fn with_output(mut self, pin: Pin, driver: O) -> Self {
        let line = Line {
            pin,
            driver,
            claimed: false,
        };
        if self.outputs.push(line).is_err() {
            warn!("hal_port: no room for output GPIO {}", pin);
        }
        self
    }

    pub fn is_claimed(&self, pin: Pin) -> bool {
        self.inputs.iter().any(|l| l.pin == pin && l.claimed)
            || self.outputs.iter().any(|l| l.pin == pin && l.claimed)
    }

    fn claim_in<P>(lines: &mut [Line<P>], pin: Pin) -> Result<(), PortError> {
        let line = lines
            .iter_mut()
            .find(|l| l.pin == pin)
            .ok_or(PortError::LineConfig {
                pin,
                rc: RC_NO_SUCH_LINE,
            })?;
        if line.claimed {
            return Err(PortError::LineBusy(pin));
        }
        line.claimed = true;
        Ok(())
    }
}

impl<I: InputPin, O: OutputPin> Default for HalLines<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputPin, O: OutputPin> LinePort for HalLines<I, O> {
    fn claim(&mut self, pin: Pin, mode: LineMode) -> Result<(), PortError> {
        match mode {
            LineMode::Input => Self::claim_in(&mut self.inputs, pin),
            LineMode::Output => Self::claim_in(&mut self.outputs, pin),
        }
    }

    fn release(&mut self, pin: Pin) {
        for line in self.inputs.iter_mut().filter(|l| l.pin == pin) {
            line.claimed = false;
        }
        for line in self.outputs.iter_mut().filter(|l| l.pin == pin) {
            line.claimed = false;
        }
    }

    fn read_level(&mut self, pin: Pin) -> bool {
        match self.inputs.iter_mut().find(|l| l.pin == pin && l.claimed) {
            Some(line) => line.driver.is_high().unwrap_or_else(|_| {
                debug!("hal_port: read of GPIO {} failed, reporting low", pin);
                false
            }),
            None => false,
        }
    }

    fn write_level(&mut self, pin: Pin, high: bool) {
        if let Some(line) = self.outputs.iter_mut().find(|l| l.pin == pin && l.claimed) {
            if line.driver.set_state(PinState::from(high)).is_err() {
                debug!("hal_port: write of GPIO {} failed", pin);
            }
        }
    }
}
