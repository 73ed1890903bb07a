//! Application core: the controller and its hardware boundary.
//!
//! [`service::Controller`] owns the mode machine and the shared state the
//! three time domains (tick, button edges, status callers) meet on.  All
//! interaction with hardware happens through the port traits in [`ports`],
//! keeping this layer testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod variant;
