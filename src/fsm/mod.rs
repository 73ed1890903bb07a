//! Function-pointer mode machine engine.
//!
//! Classic embedded table-driven FSM, generic over the mode identity and
//! the context it threads through every handler:
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  ModeTable                                         │
//! │  ┌───────────┬───────────┬──────────┬───────────┐  │
//! │  │ ModeId    │ on_enter  │ on_exit  │ on_tick   │  │
//! │  ├───────────┼───────────┼──────────┼───────────┤  │
//! │  │ Automatic │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ Scheduled │ fn(ctx)   │ -        │ fn(ctx)   │  │
//! │  │ Manual    │ -         │ -        │ fn(ctx)   │  │
//! │  └───────────┴───────────┴──────────┴───────────┘  │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a sensor-driven FSM, modes never change from inside `on_tick`:
//! every transition is requested from outside through [`Fsm::set_mode`]
//! (button presses).  `on_enter` carries the entry reset for the mode's
//! sub-state, so the reset and the mode switch happen in the same call and
//! the next `on_tick` always sees a consistent pair.

pub mod traffic;
pub mod vent;

use core::fmt::Debug;

use log::{info, warn};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// A mode enumeration usable as a table key.
///
/// `index()` must equal the mode's row in its table.
pub trait ModeId: Copy + Eq + Debug + Send + Sync + 'static {
    fn index(self) -> usize;
    /// Lower-case name used in logs and the status text.
    fn name(self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` / `on_exit` actions.
pub type ModeActionFn<C> = fn(&mut C);

/// Signature for the per-tick controller step.
pub type ModeTickFn<C> = fn(&mut C);

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.  Tables are `&'static` slices, so
/// no heap and no `dyn`.
pub struct ModeDescriptor<M, C> {
    pub id: M,
    pub on_enter: Option<ModeActionFn<C>>,
    pub on_exit: Option<ModeActionFn<C>>,
    pub on_tick: ModeTickFn<C>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The mode machine.  Holds the table and the current mode; the context is
/// owned by the caller and passed into every call.
pub struct Fsm<M: 'static, C: 'static> {
    table: &'static [ModeDescriptor<M, C>],
    current: M,
    /// Monotonic tick counter.
    tick_count: u64,
    /// Tick at which the current mode was entered.
    mode_entry_tick: u64,
}

impl<M: ModeId, C> Fsm<M, C> {
    pub fn new(table: &'static [ModeDescriptor<M, C>], initial: M) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id.index() == i),
            "mode table out of order"
        );
        Self {
            table,
            current: initial,
            tick_count: 0,
            mode_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut C) {
        info!("mode machine starting in {}", self.current.name());
        self.mode_entry_tick = self.tick_count;
        if let Some(enter) = self.descriptor(self.current).and_then(|d| d.on_enter) {
            enter(ctx);
        }
    }

    /// Run the current mode's controller step once.
    pub fn tick(&mut self, ctx: &mut C) {
        self.tick_count = self.tick_count.wrapping_add(1);
        match self.descriptor(self.current) {
            Some(d) => (d.on_tick)(ctx),
            None => warn!("no table row for mode {}", self.current.name()),
        }
    }

    /// Switch to `next`: `on_exit(current)`, then `on_enter(next)`.
    ///
    /// Returns the previous mode, or `None` if `next` is already current
    /// (nothing runs in that case).
    pub fn set_mode(&mut self, next: M, ctx: &mut C) -> Option<M> {
        if next == self.current {
            return None;
        }
        let prev = self.current;
        info!("mode transition: {} -> {}", prev.name(), next.name());

        if let Some(exit) = self.descriptor(prev).and_then(|d| d.on_exit) {
            exit(ctx);
        }

        self.current = next;
        self.mode_entry_tick = self.tick_count;

        if let Some(enter) = self.descriptor(next).and_then(|d| d.on_enter) {
            enter(ctx);
        }
        Some(prev)
    }

    pub fn current_mode(&self) -> M {
        self.current
    }

    /// Ticks run since the current mode was entered.
    pub fn ticks_in_mode(&self) -> u64 {
        self.tick_count.wrapping_sub(self.mode_entry_tick)
    }

    /// Ticks run since construction.
    pub fn total_ticks(&self) -> u64 {
        self.tick_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn descriptor(&self, mode: M) -> Option<&'static ModeDescriptor<M, C>> {
        self.table.get(mode.index())
    }
}
