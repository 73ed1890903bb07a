//! Interrupt-to-tick press queue.
//!
//! Button edges arrive in interrupt context at arbitrary instruction
//! boundaries.  The edge handler never touches controller state: it only
//! enqueues the press.  The tick driver drains the queue at the start of
//! each tick and applies presses in FIFO order, so a tick can never see a
//! half-applied mode switch.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ BTN0 IRQ    │────▶│              │     │              │
//! │             │     │  EdgeQueue   │────▶│ Tick Driver  │
//! │ BTN1 IRQ    │────▶│ (bounded)    │     │ (consumer)   │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::ports::Pin;
use crate::pins;

/// Maximum number of presses buffered between two ticks.  With a 200 ms
/// debounce and a tick rate of at least 1 Hz, two buttons cannot produce
/// more than ten presses per tick.
pub const EDGE_QUEUE_CAP: usize = 16;

/// The two debounced edge inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    /// BTN0, the mode button.
    Primary = 0,
    /// BTN1, the manual / pedestrian button.
    Secondary = 1,
}

impl Button {
    pub const ALL: [Button; 2] = [Self::Primary, Self::Secondary];

    /// GPIO the button is wired to (same on both boards).
    pub const fn gpio(self) -> Pin {
        match self {
            Self::Primary => pins::BTN0_GPIO,
            Self::Secondary => pins::BTN1_GPIO,
        }
    }
}

/// Bounded multi-producer queue of button presses.
///
/// Safe to push from interrupt context: the underlying channel guards its
/// ring with a critical section and never blocks.
pub struct EdgeQueue {
    presses: Channel<CriticalSectionRawMutex, Button, EDGE_QUEUE_CAP>,
    dropped: AtomicU32,
}

impl EdgeQueue {
    pub const fn new() -> Self {
        Self {
            presses: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a press.  Returns `false` if the queue was full and the
    /// press was dropped.
    pub fn push(&self, button: Button) -> bool {
        if self.presses.try_send(button).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Pop the oldest pending press.
    pub fn pop(&self) -> Option<Button> {
        self.presses.try_receive().ok()
    }

    /// Drain all pending presses into a callback, oldest first.
    pub fn drain(&self, mut handler: impl FnMut(Button)) {
        while let Some(button) = self.pop() {
            handler(button);
        }
    }

    /// Discard everything still queued.
    pub fn clear(&self) {
        self.presses.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    /// Presses lost to a full queue since startup.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EdgeQueue {
    fn default() -> Self {
        Self::new()
    }
}
