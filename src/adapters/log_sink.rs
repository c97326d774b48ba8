//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in the replay tool). A UI
//! binding would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SessionOpened { interval_ms } => {
                info!("OPEN  | motion interval={}ms", interval_ms);
            }
            AppEvent::SessionClosed => info!("CLOSE | subscription released"),
            AppEvent::DetectionChanged(enabled) => {
                info!("SHAKE | detection {}", if *enabled { "ON" } else { "OFF" });
            }
            AppEvent::ShakeDetected(ev) => {
                info!(
                    "SHAKE | detected t={}ms peaks={} |a|={:.2}",
                    ev.at_ms, ev.peaks, ev.magnitude
                );
            }
            AppEvent::TorchSwitched { is_on, source } => {
                info!(
                    "TORCH | {} via {:?}",
                    if *is_on { "ON" } else { "OFF" },
                    source
                );
            }
            AppEvent::ToggleDropped(source) => {
                info!("TORCH | {:?} toggle dropped (in flight)", source);
            }
            AppEvent::PermissionDenied(source) => {
                warn!(
                    "PERM  | denied for {:?} toggle: allow camera access so the flashlight can be controlled",
                    source
                );
            }
        }
    }
}
