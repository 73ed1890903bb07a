//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events through the `log`
//! facade (UART console in production, the test logger on the host).

use log::{debug, info};

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControlEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Started { variant, mode } => {
                info!("START | variant={} mode={}", variant, mode);
            }
            ControlEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            ControlEvent::CallLatched => {
                info!("CALL  | pedestrian call latched");
            }
            ControlEvent::PressIgnored(button) => {
                debug!("PRESS | {:?} ignored in current mode", button);
            }
            ControlEvent::TunableChanged { which, value } => {
                info!("TUNE  | {} = {}", which.name(), value);
            }
            ControlEvent::Stopped => {
                info!("STOP  | lines released");
            }
        }
    }
}
