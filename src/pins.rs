//! GPIO pin assignments for both controller boards.
//!
//! Single source of truth: every variant and adapter references this
//! module rather than hard-coding pin numbers.
//!
//! Numbers are ESP32-S3 GPIOs, kept clear of the strapping pins (0, 3, 45,
//! 46), the USB pair (19, 20) and the SPI flash/PSRAM bank (26..=32).  The
//! first boards were BeagleBone capes; the old header GPIO is noted on each
//! line for anyone porting a harness across.

use crate::app::ports::Pin;

/// Highest GPIO number on the ESP32-S3.
pub const MAX_GPIO: Pin = 48;

// ── CO2 vent board ────────────────────────────────────────────

/// Digital output to the servo driver: HIGH = vent open, LOW = closed.
/// Cape GPIO 68.
pub const SERVO_GPIO: Pin = 4;
/// Digital input from the CO2 comparator: HIGH = above threshold.
/// Cape GPIO 44.
pub const CO2_THRESH_GPIO: Pin = 5;

// ── Traffic-light board ───────────────────────────────────────

/// Cape GPIO 67.
pub const RED_LAMP_GPIO: Pin = 6;
/// Cape GPIO 68.
pub const YELLOW_LAMP_GPIO: Pin = 7;
/// Cape GPIO 44.
pub const GREEN_LAMP_GPIO: Pin = 15;

// ── Buttons (shared layout on both boards) ────────────────────

/// Mode button (rising edge).  Cape GPIO 26.
pub const BTN0_GPIO: Pin = 10;
/// Auxiliary button: manual override on the vent, pedestrian call on the
/// traffic light (rising edge).  Cape GPIO 46.
pub const BTN1_GPIO: Pin = 11;

/// Minimum debounce interval requested from the edge source.
pub const BUTTON_DEBOUNCE_MS: u32 = 200;
