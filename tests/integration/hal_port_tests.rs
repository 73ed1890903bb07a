//! Controllers driving `embedded-hal` pin drivers through `HalLines`.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use actuator_core::Controller;
use actuator_core::adapters::hal_port::{HalLines, RC_NO_SUCH_LINE};
use actuator_core::config::Tunables;
use actuator_core::control::phase::Lamps;
use actuator_core::error::{Error, PortError};
use actuator_core::events::Button;
use actuator_core::fsm::traffic::Traffic;
use actuator_core::fsm::vent::{Vent, VentMode};
use actuator_core::pins::{
    CO2_THRESH_GPIO, GREEN_LAMP_GPIO, RED_LAMP_GPIO, SERVO_GPIO, YELLOW_LAMP_GPIO,
};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::mock_hw::Rig;

/// Pin driver backed by a level shared with the test.
#[derive(Clone, Default)]
struct SharedPin(Rc<Cell<bool>>);

impl SharedPin {
    fn high(&self) -> bool {
        self.0.get()
    }

    fn set(&self, high: bool) {
        self.0.set(high);
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

#[test]
fn vent_runs_on_embedded_hal_pins() {
    let servo = SharedPin::default();
    let co2 = SharedPin::default();
    let mut lines = HalLines::new()
        .with_output(SERVO_GPIO, servo.clone())
        .with_input(CO2_THRESH_GPIO, co2.clone());

    let c = Controller::<Vent>::new(Tunables::default());
    let mut rig = Rig::new();
    c.start(&mut lines, &mut rig.edges, &mut rig.timer, &mut rig.sink)
        .unwrap();
    assert!(lines.is_claimed(SERVO_GPIO));
    assert!(lines.is_claimed(CO2_THRESH_GPIO));

    c.tick(&mut lines, &mut rig.timer, &mut rig.sink);
    assert!(!servo.high());

    co2.set(true);
    c.tick(&mut lines, &mut rig.timer, &mut rig.sink);
    assert!(servo.high());

    c.on_edge(Button::Secondary);
    co2.set(false);
    c.tick(&mut lines, &mut rig.timer, &mut rig.sink);
    assert_eq!(c.current_mode(), VentMode::Manual);
    assert!(servo.high());

    c.stop(&mut lines, &mut rig.edges, &mut rig.timer, &mut rig.sink);
    assert!(!servo.high());
    assert!(!lines.is_claimed(SERVO_GPIO));
    assert!(!lines.is_claimed(CO2_THRESH_GPIO));
}

#[test]
fn traffic_lamps_follow_the_cycle() {
    let red = SharedPin::default();
    let yellow = SharedPin::default();
    let green = SharedPin::default();
    let mut lines: HalLines<SharedPin, SharedPin> = HalLines::new()
        .with_output(RED_LAMP_GPIO, red.clone())
        .with_output(YELLOW_LAMP_GPIO, yellow.clone())
        .with_output(GREEN_LAMP_GPIO, green.clone());

    let c = Controller::<Traffic>::new(Tunables::default());
    let mut rig = Rig::new();
    c.start(&mut lines, &mut rig.edges, &mut rig.timer, &mut rig.sink)
        .unwrap();

    let seen: Vec<Lamps> = (0..6)
        .map(|_| {
            c.tick(&mut lines, &mut rig.timer, &mut rig.sink);
            Lamps {
                red: red.high(),
                yellow: yellow.high(),
                green: green.high(),
            }
        })
        .collect();
    assert_eq!(
        seen,
        [
            Lamps::GREEN,
            Lamps::GREEN,
            Lamps::GREEN,
            Lamps::YELLOW,
            Lamps::RED,
            Lamps::RED,
        ]
    );
}

#[test]
fn missing_line_fails_start_and_rolls_back() {
    let servo = SharedPin::default();
    let mut lines = HalLines::<SharedPin, SharedPin>::new().with_output(SERVO_GPIO, servo.clone());

    let c = Controller::<Vent>::new(Tunables::default());
    let mut rig = Rig::new();
    let err = c
        .start(&mut lines, &mut rig.edges, &mut rig.timer, &mut rig.sink)
        .unwrap_err();

    assert_eq!(
        err,
        Error::Port(PortError::LineConfig {
            pin: CO2_THRESH_GPIO,
            rc: RC_NO_SUCH_LINE
        })
    );
    assert!(!c.is_running());
    assert!(!lines.is_claimed(SERVO_GPIO));
    assert!(!servo.high());
    assert!(rig.timer.armed.is_none());
}
