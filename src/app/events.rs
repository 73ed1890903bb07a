//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port from the tick and lifecycle
//! paths, never from interrupt context.  Modes are carried by name so the
//! event type is shared by both product variants.

use crate::config::Tunable;
use crate::events::Button;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Startup completed; the first tick is armed.
    Started {
        variant: &'static str,
        mode: &'static str,
    },

    /// A button press switched the operating mode.
    ModeChanged {
        from: &'static str,
        to: &'static str,
    },

    /// A pedestrian call was latched.
    CallLatched,

    /// A press had no effect in the current mode.
    PressIgnored(Button),

    /// A config write updated a tunable.
    TunableChanged { which: Tunable, value: u32 },

    /// Shutdown completed; every line is released.
    Stopped,
}
