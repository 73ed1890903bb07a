//! Unified error types for the actuator controller.
//!
//! The control core itself is total: every controller step is a pure
//! function of valid state.  The only fallible path is startup, where the
//! line port, the edge sources and the tick timer are acquired.  A failure
//! there is fatal to the whole controller and is reported through [`Error`].

use core::fmt;

use crate::app::ports::Pin;
use crate::events::Button;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO line or edge source could not be acquired.
    Port(PortError),
    /// `start()` was called on a controller that is already running.
    AlreadyRunning,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port(e) => write!(f, "port: {e}"),
            Self::AlreadyRunning => write!(f, "controller already running"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Acquisition failures reported by the hardware collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// The line is already owned by someone else.
    LineBusy(Pin),
    /// The line exists but could not be configured (driver return code).
    LineConfig { pin: Pin, rc: i32 },
    /// The edge interrupt for a button could not be registered.
    EdgeAttach { button: Button, rc: i32 },
    /// The tick timer could not be created.
    Timer { rc: i32 },
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineBusy(pin) => write!(f, "GPIO {pin} busy"),
            Self::LineConfig { pin, rc } => write!(f, "GPIO {pin} config failed (rc={rc})"),
            Self::EdgeAttach { button, rc } => {
                write!(f, "{button:?} button IRQ attach failed (rc={rc})")
            }
            Self::Timer { rc } => write!(f, "tick timer create failed (rc={rc})"),
        }
    }
}

impl core::error::Error for PortError {}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Self::Port(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
