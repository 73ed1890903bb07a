//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements            | Connects to                 |
//! |--------------|-----------------------|-----------------------------|
//! | `console`    | config surface        | line stream (UART console)  |
//! | `hal_port`   | LinePort              | any `embedded-hal` 1.0 pins |
//! | `hardware`   | LinePort, EdgeSource  | ESP-IDF GPIO + ISR service  |
//! | `log_sink`   | EventSink             | `log` facade                |
//!
//! The tick timer adapter lives in `drivers::hw_timer`.

pub mod console;
pub mod hal_port;
#[cfg(feature = "espidf")]
pub mod hardware;
pub mod log_sink;
