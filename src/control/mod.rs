//! Per-mode controllers.
//!
//! Each controller is a small sub-state machine stepped once per tick by
//! the mode table in [`crate::fsm`].  They hold no references and perform no
//! I/O: inputs come in as arguments, and the desired output levels come back
//! as return values or are written into a caller-owned [`phase::Lamps`].

pub mod automatic;
pub mod duty_cycle;
pub mod flash;
pub mod phase;
