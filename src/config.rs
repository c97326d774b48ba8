//! Session configuration parameters
//!
//! All tunable parameters for the shake detector and the motion
//! subscription. Values can be overridden from a JSON file or the
//! command line of the replay tool; nothing here is ever persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shake detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Minimum sample magnitude (Euclidean norm) that counts as a peak
    pub threshold: f32,
    /// Cooldown after a trigger during which no new trigger may fire (ms)
    pub debounce_ms: u64,
    /// Maximum gap between two peaks of the same gesture (ms)
    pub peak_window_ms: u64,
    /// Peaks needed inside the window before a shake fires
    pub required_peaks: u8,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold: 9.5,
            debounce_ms: 1000,
            peak_window_ms: 650,
            required_peaks: 2,
        }
    }
}

/// Per-screen session configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Motion sensor delivery interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Detector tuning
    pub shake: ShakeConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 160, // 6.25 Hz
            shake: ShakeConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Reject values the detector cannot work with.
    ///
    /// Invalid ranges are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be > 0",
            ));
        }
        self.shake.validate()
    }
}

impl ShakeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "threshold must be finite and > 0",
            ));
        }
        if self.peak_window_ms == 0 {
            return Err(ConfigError::ValidationFailed("peak_window_ms must be > 0"));
        }
        if self.required_peaks == 0 {
            return Err(ConfigError::ValidationFailed("required_peaks must be >= 1"));
        }
        Ok(())
    }
}
