//! Product-variant binding.
//!
//! A [`Variant`] ties one product (the CO2 vent or the traffic light) to
//! the generic [`Controller`](super::service::Controller): its mode table,
//! its line assignments, how button presses map to modes, and how its
//! status text looks.  Both implementations live next to their mode tables
//! in [`crate::fsm::vent`] and [`crate::fsm::traffic`].

use core::fmt;

use crate::app::ports::Pin;
use crate::config::{Tunable, Tunables};
use crate::events::Button;
use crate::fsm::{ModeDescriptor, ModeId};

/// Maximum number of input or output lines a variant may declare.
pub const MAX_LINES: usize = 4;

/// What a button press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome<M> {
    /// Switch the mode machine to this mode.
    SwitchTo(M),
    /// The press latched a request inside the current mode's state.
    Latched,
    /// The press has no effect in the current mode.
    Ignored,
}

/// Point-in-time copy of everything the status text shows.
///
/// Taken under the controller's state lock in one step, then rendered
/// without holding it.
#[derive(Debug, Clone)]
pub struct Snapshot<V: Variant> {
    pub mode: V::Mode,
    pub ticks_in_mode: u64,
    pub context: V::Context,
    pub tunables: Tunables,
    pub dropped_presses: u32,
    pub running: bool,
}

pub trait Variant: Copy + fmt::Debug + Send + Sync + 'static {
    type Mode: ModeId;
    type Context: Clone + fmt::Debug + Send + 'static;

    /// Short product name for logs.
    const NAME: &'static str;
    const INITIAL_MODE: Self::Mode;

    /// Input lines sampled at the start of every tick, in the order
    /// [`latch_inputs`](Self::latch_inputs) receives them.
    const INPUTS: &'static [Pin];
    /// Output lines written at the end of every tick, in the order
    /// [`output_levels`](Self::output_levels) fills them.
    const OUTPUTS: &'static [Pin];

    /// Tunables the config surface accepts for this product.
    const TUNABLES: &'static [Tunable];
    /// Tunable updated by a bare integer write, if any.
    const BARE_VALUE: Option<Tunable>;

    fn modes() -> &'static [ModeDescriptor<Self::Mode, Self::Context>];

    fn new_context(tunables: Tunables) -> Self::Context;

    /// Hand the current tunables to the controllers before the step runs.
    fn set_tunables(ctx: &mut Self::Context, tunables: Tunables);

    /// Store this tick's input samples.
    fn latch_inputs(ctx: &mut Self::Context, levels: &[bool]);

    /// Desired output levels after the step.
    fn output_levels(ctx: &Self::Context, levels: &mut [bool]);

    /// Map a press to its effect.  May mutate `ctx` for latched requests;
    /// mode switches are applied by the caller through the mode machine.
    fn on_press(
        button: Button,
        mode: Self::Mode,
        ctx: &mut Self::Context,
    ) -> PressOutcome<Self::Mode>;

    /// Write the line-oriented status text.
    fn render_status(snapshot: &Snapshot<Self>, out: &mut impl fmt::Write) -> fmt::Result;
}
