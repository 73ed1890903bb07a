//! CO2 vent: three modes driving one servo line.
//!
//! | mode      | step each tick                                 |
//! |-----------|------------------------------------------------|
//! | Automatic | threshold-hysteresis on the CO2 input          |
//! | Scheduled | fixed open/close duty cycle                    |
//! | Manual    | vent held open                                 |
//!
//! BTN0 toggles Automatic ↔ Scheduled (ignored in Manual).  BTN1 toggles
//! Manual; leaving Manual always lands in Automatic from `(Waiting, 0)`.

use core::fmt;

use crate::app::ports::Pin;
use crate::app::variant::{PressOutcome, Snapshot, Variant};
use crate::config::{Tunable, Tunables};
use crate::control::automatic::AutomaticState;
use crate::control::duty_cycle::DutyCycle;
use crate::events::Button;
use crate::pins;
use crate::status::{on_off, yes_no};

use super::{ModeDescriptor, ModeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VentMode {
    Automatic = 0,
    Scheduled = 1,
    Manual = 2,
}

impl ModeId for VentMode {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Automatic => "co2",
            Self::Scheduled => "timer",
            Self::Manual => "manual",
        }
    }
}

/// Everything the vent's mode handlers read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VentContext {
    pub tunables: Tunables,
    /// CO2 comparator level sampled this tick.
    pub co2_high: bool,
    /// Servo line level; persists across ticks until a step writes it.
    pub servo_open: bool,
    pub automatic: AutomaticState,
    pub duty: DutyCycle,
}

impl VentContext {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            tunables,
            co2_high: false,
            servo_open: false,
            automatic: AutomaticState::new(),
            duty: DutyCycle::new(),
        }
    }
}

// ── Mode handlers ─────────────────────────────────────────────

fn automatic_enter(ctx: &mut VentContext) {
    ctx.automatic.reset();
    ctx.duty.reset();
}

fn automatic_tick(ctx: &mut VentContext) {
    let t = ctx.tunables;
    if let Some(level) = ctx
        .automatic
        .step(ctx.co2_high, t.co2_open_ticks, t.co2_cooldown_ticks)
    {
        ctx.servo_open = level;
    }
}

fn scheduled_enter(ctx: &mut VentContext) {
    ctx.duty.reset();
}

fn scheduled_tick(ctx: &mut VentContext) {
    let t = ctx.tunables;
    if let Some(level) = ctx.duty.step(t.timer_open_ticks, t.timer_close_ticks) {
        ctx.servo_open = level;
    }
}

fn manual_tick(ctx: &mut VentContext) {
    ctx.servo_open = true;
}

pub static VENT_MODES: [ModeDescriptor<VentMode, VentContext>; 3] = [
    ModeDescriptor {
        id: VentMode::Automatic,
        on_enter: Some(automatic_enter),
        on_exit: None,
        on_tick: automatic_tick,
    },
    ModeDescriptor {
        id: VentMode::Scheduled,
        on_enter: Some(scheduled_enter),
        on_exit: None,
        on_tick: scheduled_tick,
    },
    ModeDescriptor {
        id: VentMode::Manual,
        on_enter: None,
        on_exit: None,
        on_tick: manual_tick,
    },
];

// ── Variant binding ───────────────────────────────────────────

/// The CO2 vent product.
#[derive(Debug, Clone, Copy)]
pub struct Vent;

impl Variant for Vent {
    type Mode = VentMode;
    type Context = VentContext;

    const NAME: &'static str = "co2-vent";
    const INITIAL_MODE: VentMode = VentMode::Automatic;
    const INPUTS: &'static [Pin] = &[pins::CO2_THRESH_GPIO];
    const OUTPUTS: &'static [Pin] = &[pins::SERVO_GPIO];
    const TUNABLES: &'static [Tunable] = &Tunable::ALL;
    const BARE_VALUE: Option<Tunable> = None;

    fn modes() -> &'static [ModeDescriptor<VentMode, VentContext>] {
        &VENT_MODES
    }

    fn new_context(tunables: Tunables) -> VentContext {
        VentContext::new(tunables)
    }

    fn set_tunables(ctx: &mut VentContext, tunables: Tunables) {
        ctx.tunables = tunables;
    }

    fn latch_inputs(ctx: &mut VentContext, levels: &[bool]) {
        ctx.co2_high = levels.first().copied().unwrap_or(false);
    }

    fn output_levels(ctx: &VentContext, levels: &mut [bool]) {
        if let Some(servo) = levels.first_mut() {
            *servo = ctx.servo_open;
        }
    }

    fn on_press(button: Button, mode: VentMode, _ctx: &mut VentContext) -> PressOutcome<VentMode> {
        match (button, mode) {
            (Button::Primary, VentMode::Automatic) => PressOutcome::SwitchTo(VentMode::Scheduled),
            (Button::Primary, VentMode::Scheduled) => PressOutcome::SwitchTo(VentMode::Automatic),
            (Button::Primary, VentMode::Manual) => PressOutcome::Ignored,
            (Button::Secondary, VentMode::Manual) => PressOutcome::SwitchTo(VentMode::Automatic),
            (Button::Secondary, _) => PressOutcome::SwitchTo(VentMode::Manual),
        }
    }

    fn render_status(snap: &Snapshot<Self>, out: &mut impl fmt::Write) -> fmt::Result {
        let t = &snap.tunables;
        let ctx = &snap.context;

        writeln!(out, "Mode: {}", snap.mode.name())?;
        writeln!(out, "manual_mode: {}", snap.mode == VentMode::Manual)?;
        writeln!(out, "rate: {} Hz", t.rate_hz)?;
        writeln!(out, "timer_open_time: {} cycles", t.timer_open_ticks)?;
        writeln!(out, "timer_close_time: {} cycles", t.timer_close_ticks)?;
        writeln!(out, "co2_open_time: {} cycles", t.co2_open_ticks)?;
        writeln!(out, "co2_hold_time: {} cycles", t.co2_cooldown_ticks)?;
        match snap.mode {
            VentMode::Automatic => writeln!(
                out,
                "co2_substate: {} ({})",
                ctx.automatic.phase().name(),
                ctx.automatic.counter()
            )?,
            VentMode::Scheduled => writeln!(out, "timer_counter: {}", ctx.duty.counter())?,
            VentMode::Manual => writeln!(out, "override: open")?,
        }
        writeln!(out, "servo: {}", on_off(ctx.servo_open))?;
        writeln!(out, "co2_high: {}", yes_no(ctx.co2_high))?;
        writeln!(
            out,
            "SERVO_PIN={}, CO2_THRESH_PIN={}",
            u8::from(ctx.servo_open),
            u8::from(ctx.co2_high)
        )?;
        writeln!(out, "ticks_in_mode: {}", snap.ticks_in_mode)?;
        writeln!(out, "running: {}", yes_no(snap.running))?;
        writeln!(out, "dropped_presses: {}", snap.dropped_presses)
    }
}
