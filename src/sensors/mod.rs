//! Motion sensing — the sample type delivered by the motion source and
//! the [`shake`] gesture detector that consumes it.
//!
//! Samples are ephemeral: the detector reads one, folds it into its O(1)
//! state, and drops it.

pub mod shake;

use serde::{Deserialize, Serialize};

/// One tri-axis motion reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Monotonic time of the reading in milliseconds.
    pub timestamp_ms: u64,
}

impl MotionSample {
    pub const fn new(x: f32, y: f32, z: f32, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ms,
        }
    }

    /// Euclidean norm of the three axes, used as the shake intensity.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
