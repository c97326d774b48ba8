//! Outbound application events.
//!
//! The [`LightingSession`](super::service::LightingSession) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them: log them, drive a UI, or
//! record them in a test.

use crate::sensors::shake::ShakeEvent;

use super::torch::ToggleSource;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The session subscribed to the motion source.
    SessionOpened { interval_ms: u32 },

    /// The session released its subscription and detached the torch.
    SessionClosed,

    /// Shake detection was switched on or off by the UI.
    DetectionChanged(bool),

    /// The detector recognised a shake gesture.
    ShakeDetected(ShakeEvent),

    /// The torch was flipped.
    TorchSwitched { is_on: bool, source: ToggleSource },

    /// A toggle arrived while another was in flight and was dropped.
    ToggleDropped(ToggleSource),

    /// The permission authority refused; the user should be shown guidance.
    PermissionDenied(ToggleSource),
}
