//! Hardware torch adapter — drives the torch LED from a digital output.
//!
//! Works with any `embedded-hal` [`OutputPin`]. Active-high: the pin is
//! driven high for ON. Pin errors are logged and swallowed; the torch port
//! is fire-and-forget and the next toggle re-drives the pin.
//!
//! [`LogPin`] is the host stand-in for a real GPIO: it records its level
//! and logs every edge.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::{info, warn};

use crate::app::ports::TorchPort;

pub struct HardwareTorch<P> {
    pin: RefCell<P>,
}

impl<P: OutputPin> HardwareTorch<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
        }
    }

    /// Give the pin back (e.g. to re-use it after the screen closes).
    pub fn release(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: OutputPin> TorchPort for HardwareTorch<P> {
    async fn set_enabled(&self, on: bool) {
        let mut pin = self.pin.borrow_mut();
        let result = if on { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            warn!("torch pin write failed ({:?}), state may be stale", e);
        }
    }
}

// ── Host pin ──────────────────────────────────────────────────

/// Simulated GPIO that logs its level.
#[derive(Debug, Default)]
pub struct LogPin {
    high: Cell<bool>,
    edges: Cell<u32>,
}

impl LogPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    /// Number of level changes written so far.
    pub fn edges(&self) -> u32 {
        self.edges.get()
    }

    fn drive(&self, high: bool) {
        if self.high.get() != high {
            self.edges.set(self.edges.get() + 1);
        }
        self.high.set(high);
        info!("GPIO  | torch pin {}", if high { "HIGH" } else { "LOW" });
    }
}

impl ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}
