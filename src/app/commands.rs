//! Inbound commands from the UI layer.
//!
//! These represent actions the screen requests of the
//! [`LightingSession`](super::service::LightingSession).

/// Commands the UI can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Manual torch button press.
    Toggle,

    /// Flip the shake-detection switch.
    SetDetectionEnabled(bool),
}
