//! Mock hardware adapters for integration tests.
//!
//! Every port call is appended to one shared [`CallLog`], so tests can
//! assert on the exact acquisition and release order across the line port,
//! the edge source and the timer without touching real GPIO.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use actuator_core::app::events::ControlEvent;
use actuator_core::app::ports::{EdgeSource, EventSink, LineMode, LinePort, Pin, TickTimer};
use actuator_core::app::variant::Variant;
use actuator_core::error::PortError;
use actuator_core::events::Button;
use actuator_core::{Controller, Result};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Claim(Pin, LineMode),
    Release(Pin),
    Write(Pin, bool),
    Attach(Button, Pin),
    Detach(Button),
    Arm(Duration),
    Cancel,
}

pub type CallLog = Rc<RefCell<Vec<HwCall>>>;

// ── Lines ─────────────────────────────────────────────────────

pub struct MockLines {
    log: CallLog,
    /// Level returned by `read_level`, per input pin.
    pub inputs: HashMap<Pin, bool>,
    /// Last level written, per output pin.
    pub outputs: HashMap<Pin, bool>,
    pub claimed: Vec<Pin>,
    /// Claiming this pin fails with `LineConfig`.
    pub fail_claim: Option<Pin>,
}

#[allow(dead_code)]
impl MockLines {
    pub fn level(&self, pin: Pin) -> bool {
        self.outputs.get(&pin).copied().unwrap_or(false)
    }

    pub fn set_input(&mut self, pin: Pin, high: bool) {
        self.inputs.insert(pin, high);
    }
}

impl LinePort for MockLines {
    fn claim(&mut self, pin: Pin, mode: LineMode) -> core::result::Result<(), PortError> {
        self.log.borrow_mut().push(HwCall::Claim(pin, mode));
        if self.fail_claim == Some(pin) {
            return Err(PortError::LineConfig { pin, rc: -16 });
        }
        if self.claimed.contains(&pin) {
            return Err(PortError::LineBusy(pin));
        }
        self.claimed.push(pin);
        Ok(())
    }

    fn release(&mut self, pin: Pin) {
        self.log.borrow_mut().push(HwCall::Release(pin));
        self.claimed.retain(|&p| p != pin);
    }

    fn read_level(&mut self, pin: Pin) -> bool {
        assert!(self.claimed.contains(&pin), "read of unclaimed GPIO {pin}");
        self.inputs.get(&pin).copied().unwrap_or(false)
    }

    fn write_level(&mut self, pin: Pin, high: bool) {
        assert!(self.claimed.contains(&pin), "write to unclaimed GPIO {pin}");
        self.log.borrow_mut().push(HwCall::Write(pin, high));
        self.outputs.insert(pin, high);
    }
}

// ── Edges ─────────────────────────────────────────────────────

pub struct MockEdges {
    log: CallLog,
    pub attached: Vec<Button>,
    /// Attaching this button fails with `EdgeAttach`.
    pub fail_attach: Option<Button>,
}

impl EdgeSource for MockEdges {
    fn attach(
        &mut self,
        button: Button,
        pin: Pin,
        _debounce_ms: u32,
    ) -> core::result::Result<(), PortError> {
        self.log.borrow_mut().push(HwCall::Attach(button, pin));
        if self.fail_attach == Some(button) {
            return Err(PortError::EdgeAttach { button, rc: -22 });
        }
        self.attached.push(button);
        Ok(())
    }

    fn detach(&mut self, button: Button) {
        self.log.borrow_mut().push(HwCall::Detach(button));
        self.attached.retain(|&b| b != button);
    }
}

// ── Timer ─────────────────────────────────────────────────────

pub struct MockTimer {
    log: CallLog,
    pub armed: Option<Duration>,
}

impl TickTimer for MockTimer {
    fn arm(&mut self, period: Duration) {
        self.log.borrow_mut().push(HwCall::Arm(period));
        self.armed = Some(period);
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(HwCall::Cancel);
        self.armed = None;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ControlEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: all mocks wired together ─────────────────────────────

pub struct Rig {
    pub log: CallLog,
    pub lines: MockLines,
    pub edges: MockEdges,
    pub timer: MockTimer,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        Self {
            lines: MockLines {
                log: Rc::clone(&log),
                inputs: HashMap::new(),
                outputs: HashMap::new(),
                claimed: Vec::new(),
                fail_claim: None,
            },
            edges: MockEdges {
                log: Rc::clone(&log),
                attached: Vec::new(),
                fail_attach: None,
            },
            timer: MockTimer {
                log: Rc::clone(&log),
                armed: None,
            },
            sink: RecordingSink::default(),
            log,
        }
    }

    pub fn start<V: Variant>(&mut self, c: &Controller<V>) -> Result<()> {
        c.start(&mut self.lines, &mut self.edges, &mut self.timer, &mut self.sink)
    }

    pub fn stop<V: Variant>(&mut self, c: &Controller<V>) {
        c.stop(&mut self.lines, &mut self.edges, &mut self.timer, &mut self.sink);
    }

    pub fn tick<V: Variant>(&mut self, c: &Controller<V>) {
        c.tick(&mut self.lines, &mut self.timer, &mut self.sink);
    }

    /// Run `n` ticks, recording `observe` after each.
    pub fn run<V: Variant, T>(
        &mut self,
        c: &Controller<V>,
        n: usize,
        mut observe: impl FnMut(&Self, &Controller<V>) -> T,
    ) -> Vec<T> {
        (0..n)
            .map(|_| {
                self.tick(c);
                observe(self, c)
            })
            .collect()
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&mut self) {
        self.log.borrow_mut().clear();
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
