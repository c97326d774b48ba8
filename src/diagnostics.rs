//! Session diagnostics.
//!
//! Counters for everything that flows through a
//! [`LightingSession`](crate::app::service::LightingSession), plus the last
//! [`TOGGLE_HISTORY`] toggles in a fixed-capacity ring. Counters are folded
//! from the same [`AppEvent`]s the session hands to its event sink, so the
//! two views never disagree.

use heapless::HistoryBuffer;

use crate::app::events::AppEvent;
use crate::app::torch::ToggleSource;

/// Number of toggles kept in the recent-history ring.
pub const TOGGLE_HISTORY: usize = 8;

/// One applied toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRecord {
    pub source: ToggleSource,
    pub is_on: bool,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub samples_processed: u64,
    pub shakes_detected: u32,
    pub toggles_applied: u32,
    pub toggles_dropped: u32,
    pub permission_denials: u32,
}

#[derive(Clone, Default)]
pub struct SessionMetrics {
    counters: MetricsSnapshot,
    recent: HistoryBuffer<ToggleRecord, TOGGLE_HISTORY>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one sample handed to the detector.
    pub fn record_sample(&mut self) {
        self.counters.samples_processed = self.counters.samples_processed.saturating_add(1);
    }

    /// Fold an outbound event into the counters.
    pub fn record(&mut self, event: &AppEvent) {
        let c = &mut self.counters;
        match event {
            AppEvent::ShakeDetected(_) => c.shakes_detected = c.shakes_detected.saturating_add(1),
            AppEvent::TorchSwitched { is_on, source } => {
                c.toggles_applied = c.toggles_applied.saturating_add(1);
                self.recent.write(ToggleRecord {
                    source: *source,
                    is_on: *is_on,
                });
            }
            AppEvent::ToggleDropped(_) => c.toggles_dropped = c.toggles_dropped.saturating_add(1),
            AppEvent::PermissionDenied(_) => {
                c.permission_denials = c.permission_denials.saturating_add(1);
            }
            AppEvent::SessionOpened { .. }
            | AppEvent::SessionClosed
            | AppEvent::DetectionChanged(_) => {}
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.counters
    }

    /// Recent toggles, oldest first.
    pub fn recent_toggles(&self) -> heapless::Vec<ToggleRecord, TOGGLE_HISTORY> {
        self.recent.oldest_ordered().copied().collect()
    }

    /// Most recent toggle, if any.
    pub fn last_toggle(&self) -> Option<ToggleRecord> {
        self.recent.recent().copied()
    }
}
