//! Tunable controller parameters.
//!
//! All durations are **tick counts**, not seconds.  A duration of 10 at the
//! default 1 Hz rate lasts ten seconds; the same setting at 5 Hz lasts two.
//! Changing `rate` therefore rescales every duration in wall-clock terms.
//!
//! The live values sit in [`SharedTunables`]: one atomic word per parameter,
//! written by the config surface and loaded by the tick context.  A tick may
//! use a value that is one write stale; nothing needs more than word-sized
//! atomicity.

use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Lowest accepted tick rate (Hz).
pub const MIN_RATE_HZ: u32 = 1;
/// Highest accepted tick rate (Hz).
pub const MAX_RATE_HZ: u32 = 9;

/// Plain-value copy of every tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tunables {
    // --- Automatic (CO2) controller ---
    /// Ticks the vent stays open once the CO2 threshold is crossed.
    pub co2_open_ticks: u32,
    /// Ticks the CO2 input is ignored after the vent closes.
    pub co2_cooldown_ticks: u32,

    // --- Duty-cycle (timer) controller ---
    /// Open part of the timer cycle, in ticks.
    pub timer_open_ticks: u32,
    /// Closed part of the timer cycle, in ticks.
    pub timer_close_ticks: u32,

    // --- Tick driver ---
    /// Tick frequency in Hz.
    pub rate_hz: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            co2_open_ticks: 10,
            co2_cooldown_ticks: 5,
            timer_open_ticks: 5,
            timer_close_ticks: 10,
            rate_hz: 1,
        }
    }
}

impl Tunables {
    /// Time between two ticks at the configured rate.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.rate_hz.clamp(MIN_RATE_HZ, MAX_RATE_HZ)
    }

    /// Read one parameter by name.
    pub fn get(&self, which: Tunable) -> u32 {
        match which {
            Tunable::Co2Open => self.co2_open_ticks,
            Tunable::Co2Cooldown => self.co2_cooldown_ticks,
            Tunable::TimerOpen => self.timer_open_ticks,
            Tunable::TimerClose => self.timer_close_ticks,
            Tunable::Rate => self.rate_hz,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

/// The set of writable parameters.  Each maps to one command name on the
/// config surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tunable {
    Co2Open,
    Co2Cooldown,
    TimerOpen,
    TimerClose,
    Rate,
}

impl Tunable {
    pub const ALL: [Tunable; 5] = [
        Self::Co2Open,
        Self::Co2Cooldown,
        Self::TimerOpen,
        Self::TimerClose,
        Self::Rate,
    ];

    /// Command name as written on the config surface.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Co2Open => "co2time",
            Self::Co2Cooldown => "co2hold",
            Self::TimerOpen => "timeropen",
            Self::TimerClose => "timerclose",
            Self::Rate => "rate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether `value` lies in this parameter's domain.
    pub fn accepts(self, value: u32) -> bool {
        match self {
            Self::Rate => (MIN_RATE_HZ..=MAX_RATE_HZ).contains(&value),
            _ => value > 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared (atomic) storage
// ---------------------------------------------------------------------------

/// Live tunables shared between the config surface and the tick context.
pub struct SharedTunables {
    co2_open_ticks: AtomicU32,
    co2_cooldown_ticks: AtomicU32,
    timer_open_ticks: AtomicU32,
    timer_close_ticks: AtomicU32,
    rate_hz: AtomicU32,
}

impl SharedTunables {
    pub const fn new(initial: Tunables) -> Self {
        Self {
            co2_open_ticks: AtomicU32::new(initial.co2_open_ticks),
            co2_cooldown_ticks: AtomicU32::new(initial.co2_cooldown_ticks),
            timer_open_ticks: AtomicU32::new(initial.timer_open_ticks),
            timer_close_ticks: AtomicU32::new(initial.timer_close_ticks),
            rate_hz: AtomicU32::new(initial.rate_hz),
        }
    }

    fn cell(&self, which: Tunable) -> &AtomicU32 {
        match which {
            Tunable::Co2Open => &self.co2_open_ticks,
            Tunable::Co2Cooldown => &self.co2_cooldown_ticks,
            Tunable::TimerOpen => &self.timer_open_ticks,
            Tunable::TimerClose => &self.timer_close_ticks,
            Tunable::Rate => &self.rate_hz,
        }
    }

    pub fn get(&self, which: Tunable) -> u32 {
        self.cell(which).load(Ordering::Relaxed)
    }

    /// Store `value` if it is inside the parameter's domain.
    /// Returns `false` (and changes nothing) otherwise.
    pub fn set(&self, which: Tunable, value: u32) -> bool {
        if !which.accepts(value) {
            return false;
        }
        self.cell(which).store(value, Ordering::Relaxed);
        true
    }

    /// Load every parameter.  Each word is read atomically; the set as a
    /// whole is not, which is fine since parameters are independent.
    pub fn snapshot(&self) -> Tunables {
        Tunables {
            co2_open_ticks: self.get(Tunable::Co2Open),
            co2_cooldown_ticks: self.get(Tunable::Co2Cooldown),
            timer_open_ticks: self.get(Tunable::TimerOpen),
            timer_close_ticks: self.get(Tunable::TimerClose),
            rate_hz: self.get(Tunable::Rate),
        }
    }
}

impl Default for SharedTunables {
    fn default() -> Self {
        Self::new(Tunables::default())
    }
}
