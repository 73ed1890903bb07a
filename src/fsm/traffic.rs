//! Traffic light: three modes driving red, yellow and green lamps.
//!
//! BTN0 cycles Normal → FlashRed → FlashYellow → Normal.  BTN1 latches a
//! pedestrian call, but only while in Normal.

use core::fmt;

use crate::app::ports::Pin;
use crate::app::variant::{PressOutcome, Snapshot, Variant};
use crate::config::{Tunable, Tunables};
use crate::control::flash::Flasher;
use crate::control::phase::{Lamp, Lamps, PhaseSequence};
use crate::events::Button;
use crate::pins;
use crate::status::{on_off, yes_no};

use super::{ModeDescriptor, ModeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightMode {
    Normal = 0,
    FlashRed = 1,
    FlashYellow = 2,
}

impl LightMode {
    /// Mode selected by the next BTN0 press.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::FlashRed,
            Self::FlashRed => Self::FlashYellow,
            Self::FlashYellow => Self::Normal,
        }
    }
}

impl ModeId for LightMode {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::FlashRed => "flashing-red",
            Self::FlashYellow => "flashing-yellow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficContext {
    pub tunables: Tunables,
    pub lamps: Lamps,
    pub sequence: PhaseSequence,
    pub flasher: Flasher,
}

impl TrafficContext {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            tunables,
            lamps: Lamps::DARK,
            sequence: PhaseSequence::new(),
            flasher: Flasher::new(),
        }
    }
}

// ── Mode handlers ─────────────────────────────────────────────

fn normal_enter(ctx: &mut TrafficContext) {
    ctx.sequence.restart();
}

fn normal_tick(ctx: &mut TrafficContext) {
    ctx.sequence.step(&mut ctx.lamps);
}

fn flash_enter(ctx: &mut TrafficContext) {
    ctx.flasher.reset();
}

fn flash_red_tick(ctx: &mut TrafficContext) {
    ctx.flasher.step(Lamp::Red, &mut ctx.lamps);
}

fn flash_yellow_tick(ctx: &mut TrafficContext) {
    ctx.flasher.step(Lamp::Yellow, &mut ctx.lamps);
}

pub static LIGHT_MODES: [ModeDescriptor<LightMode, TrafficContext>; 3] = [
    ModeDescriptor {
        id: LightMode::Normal,
        on_enter: Some(normal_enter),
        on_exit: None,
        on_tick: normal_tick,
    },
    ModeDescriptor {
        id: LightMode::FlashRed,
        on_enter: Some(flash_enter),
        on_exit: None,
        on_tick: flash_red_tick,
    },
    ModeDescriptor {
        id: LightMode::FlashYellow,
        on_enter: Some(flash_enter),
        on_exit: None,
        on_tick: flash_yellow_tick,
    },
];

// ── Variant binding ───────────────────────────────────────────

/// The traffic-light product.
#[derive(Debug, Clone, Copy)]
pub struct Traffic;

impl Variant for Traffic {
    type Mode = LightMode;
    type Context = TrafficContext;

    const NAME: &'static str = "traffic-light";
    const INITIAL_MODE: LightMode = LightMode::Normal;
    const INPUTS: &'static [Pin] = &[];
    const OUTPUTS: &'static [Pin] = &[
        pins::RED_LAMP_GPIO,
        pins::YELLOW_LAMP_GPIO,
        pins::GREEN_LAMP_GPIO,
    ];
    const TUNABLES: &'static [Tunable] = &[Tunable::Rate];
    const BARE_VALUE: Option<Tunable> = Some(Tunable::Rate);

    fn modes() -> &'static [ModeDescriptor<LightMode, TrafficContext>] {
        &LIGHT_MODES
    }

    fn new_context(tunables: Tunables) -> TrafficContext {
        TrafficContext::new(tunables)
    }

    fn set_tunables(ctx: &mut TrafficContext, tunables: Tunables) {
        ctx.tunables = tunables;
    }

    fn latch_inputs(_ctx: &mut TrafficContext, _levels: &[bool]) {}

    fn output_levels(ctx: &TrafficContext, levels: &mut [bool]) {
        let lamps = [ctx.lamps.red, ctx.lamps.yellow, ctx.lamps.green];
        for (out, level) in levels.iter_mut().zip(lamps) {
            *out = level;
        }
    }

    fn on_press(
        button: Button,
        mode: LightMode,
        ctx: &mut TrafficContext,
    ) -> PressOutcome<LightMode> {
        match (button, mode) {
            (Button::Primary, _) => PressOutcome::SwitchTo(mode.next()),
            (Button::Secondary, LightMode::Normal) => {
                if ctx.sequence.set_call() {
                    PressOutcome::Latched
                } else {
                    PressOutcome::Ignored
                }
            }
            (Button::Secondary, _) => PressOutcome::Ignored,
        }
    }

    fn render_status(snap: &Snapshot<Self>, out: &mut impl fmt::Write) -> fmt::Result {
        let ctx = &snap.context;

        writeln!(out, "Mode: {}", snap.mode.name())?;
        writeln!(out, "Cycle rate: {} Hz", snap.tunables.rate_hz)?;
        writeln!(out, "Red: {}", on_off(ctx.lamps.red))?;
        writeln!(out, "Yellow: {}", on_off(ctx.lamps.yellow))?;
        writeln!(out, "Green: {}", on_off(ctx.lamps.green))?;
        writeln!(out, "Pedestrian present: {}", yes_no(ctx.sequence.call_pending()))?;
        match snap.mode {
            LightMode::Normal => match ctx.sequence.crossing_counter() {
                Some(n) => writeln!(out, "Crossing: {}", n)?,
                None => writeln!(out, "Phase: {}", ctx.sequence.phase())?,
            },
            LightMode::FlashRed | LightMode::FlashYellow => {
                writeln!(out, "Flash: {}", on_off(ctx.flasher.is_on()))?
            }
        }
        writeln!(out, "ticks_in_mode: {}", snap.ticks_in_mode)?;
        writeln!(out, "running: {}", yes_no(snap.running))?;
        writeln!(out, "dropped_presses: {}", snap.dropped_presses)
    }
}
