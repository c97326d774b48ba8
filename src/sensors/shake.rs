//! Debounced multi-peak shake detector.
//!
//! ## Algorithm
//!
//! Each sample is reduced to its magnitude. A sample at or above the
//! threshold is a **peak**. Peaks closer together than the peak window
//! accumulate; once `required_peaks` have accumulated a shake fires and a
//! cooldown (debounce) starts.
//!
//! | Condition                                   | Effect                         |
//! |---------------------------------------------|--------------------------------|
//! | detection disabled                          | ignored, state untouched       |
//! | magnitude < threshold (or NaN)              | ignored, state untouched       |
//! | < debounce since last trigger               | ignored, state untouched       |
//! | > peak window since last peak (or no peak)  | peak count restarts at 1       |
//! | peak count reaches `required_peaks`         | [`ShakeEvent`], count reset    |
//!
//! A single jolt produces one peak and never fires. Sustained vibration
//! rarely stays above threshold on two peaks inside the window.
//!
//! The reducer never blocks and holds O(1) state, so it can run at the
//! sensor's native delivery rate.

use log::{debug, info};

use super::MotionSample;
use crate::config::ShakeConfig;

/// Mutable detector state, threaded through [`on_sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorState {
    /// Time of the last emitted shake. Only set when a shake fires.
    pub last_trigger_at_ms: Option<u64>,
    /// Qualifying peaks in the current window.
    pub peak_count: u8,
    /// Time of the most recent qualifying peak.
    pub last_peak_at_ms: Option<u64>,
    /// Whether detection is active. Written by the UI layer only.
    pub enabled: bool,
}

/// Emitted when a shake gesture is recognised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeEvent {
    /// Timestamp of the sample that completed the gesture.
    pub at_ms: u64,
    /// Number of peaks that made up the gesture.
    pub peaks: u8,
    /// Magnitude of the completing sample.
    pub magnitude: f32,
}

/// Fold one sample into the detector state.
///
/// Total over all inputs: never panics, always returns a valid next state.
pub fn on_sample(
    state: DetectorState,
    sample: &MotionSample,
    config: &ShakeConfig,
) -> (DetectorState, Option<ShakeEvent>) {
    if !state.enabled {
        return (state, None);
    }

    let magnitude = sample.magnitude();
    let now = sample.timestamp_ms;

    if magnitude.is_nan() || magnitude < config.threshold {
        return (state, None);
    }
    if let Some(last) = state.last_trigger_at_ms {
        if now.saturating_sub(last) < config.debounce_ms {
            return (state, None);
        }
    }

    let mut next = state;
    let window_expired = match state.last_peak_at_ms {
        Some(last) => now.saturating_sub(last) > config.peak_window_ms,
        None => true,
    };
    if window_expired {
        next.peak_count = 0;
    }
    next.peak_count = next.peak_count.saturating_add(1);
    next.last_peak_at_ms = Some(now);

    if next.peak_count < config.required_peaks {
        debug!(
            "shake: peak {}/{} at {}ms (|a|={:.2})",
            next.peak_count, config.required_peaks, now, magnitude
        );
        return (next, None);
    }

    let event = ShakeEvent {
        at_ms: now,
        peaks: next.peak_count,
        magnitude,
    };
    next.last_trigger_at_ms = Some(now);
    next.peak_count = 0;
    info!("shake: detected at {}ms ({} peaks)", now, event.peaks);
    (next, Some(event))
}

/// Owns a [`DetectorState`] and its tuning.
pub struct ShakeDetector {
    config: ShakeConfig,
    state: DetectorState,
}

impl ShakeDetector {
    /// New detector, disabled until the UI enables it.
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            state: DetectorState::default(),
        }
    }

    /// Feed one sample; returns a shake if this sample completed one.
    pub fn on_sample(&mut self, sample: &MotionSample) -> Option<ShakeEvent> {
        let (next, event) = on_sample(self.state, sample, &self.config);
        self.state = next;
        event
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }
}
