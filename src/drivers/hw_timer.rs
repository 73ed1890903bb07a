//! One-shot tick timer on ESP-IDF's `esp_timer`.
//!
//! The callback runs in the esp_timer task and only raises an atomic flag;
//! the main loop polls [`EspTickTimer::take_pending`] and runs the tick
//! itself, so a tick never overlaps `stop()`.

use core::ptr;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::TickTimer;
use crate::error::PortError;

static TICK_PENDING: AtomicBool = AtomicBool::new(false);

unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    TICK_PENDING.store(true, Ordering::Release);
}

pub struct EspTickTimer {
    handle: esp_timer_handle_t,
}

impl EspTickTimer {
    pub fn new() -> Result<Self, PortError> {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = ptr::null_mut();
        // SAFETY: `args` and `handle` outlive the call; the callback only
        // touches a static atomic.
        let rc = unsafe { esp_timer_create(&args, &mut handle) };
        if rc != ESP_OK as i32 {
            return Err(PortError::Timer { rc });
        }
        info!("hw_timer: tick timer created");
        Ok(Self { handle })
    }

    /// Consume a pending expiry.
    pub fn take_pending(&self) -> bool {
        TICK_PENDING.swap(false, Ordering::Acquire)
    }
}

impl TickTimer for EspTickTimer {
    fn arm(&mut self, period: Duration) {
        let us = u64::try_from(period.as_micros()).unwrap_or(u64::MAX);
        // SAFETY: handle is valid for the lifetime of `self`.  Stopping an
        // idle timer returns ESP_ERR_INVALID_STATE, which is harmless.
        unsafe {
            esp_timer_stop(self.handle);
            let rc = esp_timer_start_once(self.handle, us);
            if rc != ESP_OK as i32 {
                warn!("hw_timer: arm failed (rc={})", rc);
            }
        }
    }

    fn cancel(&mut self) {
        // SAFETY: handle is valid; see `arm`.
        unsafe {
            esp_timer_stop(self.handle);
        }
        TICK_PENDING.store(false, Ordering::Release);
    }
}

impl Drop for EspTickTimer {
    fn drop(&mut self) {
        // SAFETY: stop then delete; the handle is not used afterwards.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
        }
    }
}
