//! Error types for the shake-torch core.
//!
//! Torch and config errors are `Copy` so they can be passed back out of
//! the async toggle path and fanned out to event sinks without
//! allocation. Trace errors wrap I/O and JSON failures.

use core::fmt;

// ---------------------------------------------------------------------------
// Torch controller errors
// ---------------------------------------------------------------------------

/// Failures surfaced by [`TorchController`](crate::app::torch::TorchController).
///
/// A toggle that collides with one already in flight is *not* an error:
/// it resolves to [`ToggleOutcome::Dropped`](crate::app::torch::ToggleOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorchError {
    /// The permission authority refused (or the user dismissed the dialog).
    /// The torch is left untouched.
    PermissionDenied,
    /// The owning session was torn down; the result is discarded.
    Detached,
}

impl fmt::Display for TorchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(
                f,
                "camera permission required: allow camera access so the flashlight can be controlled"
            ),
            Self::Detached => write!(f, "torch controller detached"),
        }
    }
}

impl std::error::Error for TorchError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`SessionConfig::validate`](crate::config::SessionConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Trace errors
// ---------------------------------------------------------------------------

/// Errors from reading a recorded motion trace.
#[derive(Debug)]
pub enum TraceError {
    /// Underlying reader failed.
    Io(std::io::Error),
    /// A line could not be parsed (1-based line number).
    Parse { line: usize, source: serde_json::Error },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "trace I/O error: {e}"),
            Self::Parse { line, source } => write!(f, "trace line {line}: {source}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
