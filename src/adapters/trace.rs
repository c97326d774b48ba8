//! Recorded motion traces (JSON lines).
//!
//! One entry per line. Blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! {"kind":"detection","timestamp_ms":0,"enabled":true}
//! {"kind":"sample","timestamp_ms":0,"x":0.4,"y":11.8,"z":1.2}
//! {"kind":"toggle","timestamp_ms":2500}
//! ```

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::app::commands::UiCommand;
use crate::error::TraceError;
use crate::sensors::MotionSample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    /// A motion reading.
    Sample(MotionSample),
    /// A manual torch button press.
    Toggle { timestamp_ms: u64 },
    /// The shake-detection switch was flipped.
    Detection { timestamp_ms: u64, enabled: bool },
}

impl TraceEntry {
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Sample(s) => s.timestamp_ms,
            Self::Toggle { timestamp_ms } | Self::Detection { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    /// The UI command this entry stands for, if it is not a sample.
    pub fn command(&self) -> Option<UiCommand> {
        match self {
            Self::Sample(_) => None,
            Self::Toggle { .. } => Some(UiCommand::Toggle),
            Self::Detection { enabled, .. } => Some(UiCommand::SetDetectionEnabled(*enabled)),
        }
    }
}

/// Read every entry from `reader`.
pub fn read_trace(reader: impl BufRead) -> Result<Vec<TraceEntry>, TraceError> {
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = serde_json::from_str(trimmed).map_err(|source| TraceError::Parse {
            line: idx + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
