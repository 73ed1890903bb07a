//! Actuator controller library.
//!
//! A fixed-rate tick drives a table-driven mode machine that samples digital
//! inputs and drives digital outputs, while debounced button presses switch
//! modes between ticks.  Two products share the core: a CO2 vent
//! ([`fsm::vent::Vent`]) and a traffic light ([`fsm::traffic::Traffic`]).
//!
//! Everything except the ESP-IDF adapters builds and tests on the host; the
//! board-specific code sits behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
#[cfg(feature = "espidf")]
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod status;

pub use app::service::Controller;
pub use error::{Error, PortError, Result};
