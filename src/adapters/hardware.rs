//! ESP-IDF GPIO adapters: [`EspGpio`] (lines) and [`EspButtons`] (edges).
//!
//! Button interrupts only bump a per-button atomic counter.  The main loop
//! calls [`EspButtons::dispatch`] to turn those counts into
//! [`Controller::on_edge`] calls, so nothing heavier than an atomic add runs
//! in ISR context.

use core::ffi::c_void;
use core::sync::atomic::{AtomicU32, Ordering};

use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::{EdgeSource, LineMode, LinePort, Pin};
use crate::app::service::Controller;
use crate::app::variant::Variant;
use crate::error::PortError;
use crate::events::{Button, EDGE_QUEUE_CAP};
use crate::pins;

// ── Lines ─────────────────────────────────────────────────────

/// Raw GPIO access through the IDF driver.
#[derive(Debug, Default)]
pub struct EspGpio;

impl EspGpio {
    pub fn new() -> Self {
        Self
    }
}

fn pin_mask(pin: Pin) -> Result<u64, PortError> {
    if pin > pins::MAX_GPIO {
        return Err(PortError::LineConfig {
            pin,
            rc: ESP_ERR_INVALID_ARG as i32,
        });
    }
    Ok(1u64 << pin)
}

impl LinePort for EspGpio {
    fn claim(&mut self, pin: Pin, mode: LineMode) -> Result<(), PortError> {
        let conf = gpio_config_t {
            pin_bit_mask: pin_mask(pin)?,
            mode: match mode {
                LineMode::Input => gpio_mode_t_GPIO_MODE_INPUT,
                // Input enabled too so the level can be read back.
                LineMode::Output => gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            },
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: `conf` is a valid, fully initialised config on the stack.
        let rc = unsafe { gpio_config(&conf) };
        if rc != ESP_OK as i32 {
            return Err(PortError::LineConfig { pin, rc });
        }
        Ok(())
    }

    fn release(&mut self, pin: Pin) {
        // SAFETY: resetting a pin has no preconditions beyond a valid number.
        let rc = unsafe { gpio_reset_pin(pin as gpio_num_t) };
        if rc != ESP_OK as i32 {
            warn!("gpio: reset of GPIO {} failed (rc={})", pin, rc);
        }
    }

    fn read_level(&mut self, pin: Pin) -> bool {
        // SAFETY: reading a configured pin is side-effect free.
        unsafe { gpio_get_level(pin as gpio_num_t) != 0 }
    }

    fn write_level(&mut self, pin: Pin, high: bool) {
        // SAFETY: pin was configured as an output in `claim`.
        unsafe {
            gpio_set_level(pin as gpio_num_t, u32::from(high));
        }
    }
}

// ── Edges ─────────────────────────────────────────────────────

/// Debounced presses not yet handed to the controller, per button.
static PENDING_PRESSES: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];
/// Timestamp (ms since boot) of the last accepted edge, per button.
static LAST_EDGE_MS: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];
static DEBOUNCE_MS: AtomicU32 = AtomicU32::new(0);

unsafe extern "C" fn edge_isr(arg: *mut c_void) {
    let idx = arg as usize;
    if idx >= PENDING_PRESSES.len() {
        return;
    }
    // SAFETY: esp_timer_get_time is ISR-safe.
    let now_ms = (unsafe { esp_timer_get_time() } / 1000) as u32;
    let last = LAST_EDGE_MS[idx].load(Ordering::Relaxed);
    if now_ms.wrapping_sub(last) < DEBOUNCE_MS.load(Ordering::Relaxed) {
        return;
    }
    LAST_EDGE_MS[idx].store(now_ms, Ordering::Relaxed);
    PENDING_PRESSES[idx].fetch_add(1, Ordering::Release);
}

/// Rising-edge button interrupts with software debounce.
#[derive(Debug, Default)]
pub struct EspButtons {
    pins: [Option<Pin>; 2],
    isr_service: bool,
}

impl EspButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward presses recorded since the last call to `controller`.
    pub fn dispatch<V: Variant>(&self, controller: &Controller<V>) {
        for button in Button::ALL {
            let n = PENDING_PRESSES[button as usize].swap(0, Ordering::Acquire);
            for _ in 0..n.min(EDGE_QUEUE_CAP as u32 + 1) {
                controller.on_edge(button);
            }
        }
    }

    fn ensure_isr_service(&mut self, button: Button) -> Result<(), PortError> {
        if self.isr_service {
            return Ok(());
        }
        // SAFETY: installs the shared per-pin dispatcher once.
        let rc = unsafe { gpio_install_isr_service(0) };
        // Already installed by someone else is fine.
        if rc != ESP_OK as i32 && rc != ESP_ERR_INVALID_STATE as i32 {
            return Err(PortError::EdgeAttach { button, rc });
        }
        self.isr_service = true;
        Ok(())
    }
}

impl EdgeSource for EspButtons {
    fn attach(&mut self, button: Button, pin: Pin, debounce_ms: u32) -> Result<(), PortError> {
        self.ensure_isr_service(button)?;
        DEBOUNCE_MS.store(debounce_ms, Ordering::Relaxed);

        let conf = gpio_config_t {
            pin_bit_mask: pin_mask(pin)?,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        // SAFETY: valid config; the handler only touches static atomics and
        // its argument is a plain index, never dereferenced.
        unsafe {
            let rc = gpio_config(&conf);
            if rc != ESP_OK as i32 {
                return Err(PortError::EdgeAttach { button, rc });
            }
            let rc = gpio_isr_handler_add(
                pin as gpio_num_t,
                Some(edge_isr),
                button as usize as *mut c_void,
            );
            if rc != ESP_OK as i32 {
                gpio_reset_pin(pin as gpio_num_t);
                return Err(PortError::EdgeAttach { button, rc });
            }
        }

        PENDING_PRESSES[button as usize].store(0, Ordering::Relaxed);
        self.pins[button as usize] = Some(pin);
        info!("buttons: {:?} on GPIO {} (debounce {} ms)", button, pin, debounce_ms);
        Ok(())
    }

    fn detach(&mut self, button: Button) {
        let Some(pin) = self.pins[button as usize].take() else {
            return;
        };
        // SAFETY: the handler was registered for this pin in `attach`.
        // `gpio_isr_handler_remove` waits for a running handler to finish.
        unsafe {
            gpio_isr_handler_remove(pin as gpio_num_t);
            gpio_reset_pin(pin as gpio_num_t);
        }
        PENDING_PRESSES[button as usize].store(0, Ordering::Relaxed);
    }
}
