//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   MotionSourcePort ──▶ ShakeDetector ──▶ TorchController ──▶ TorchPort
//!                                              ▲
//!                                       PermissionPort
//! ```
//!
//! Adapters (platform sensors, permission dialogs, torch drivers, event
//! sinks) implement these traits. The domain core never touches a
//! platform API directly.
//!
//! The permission and torch ports are async: a permission request may
//! park on a user-facing dialog, and a torch command may wait on a driver.
//! Everything runs on one logical thread, so ports take `&self` and use
//! interior mutability where they need state.

#![allow(async_fn_in_trait)]

use crate::sensors::MotionSample;

// ───────────────────────────────────────────────────────────────
// Motion source port (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Callback invoked once per delivered sample.
pub type SampleCallback = Box<dyn FnMut(MotionSample)>;

/// Opaque handle returned by [`MotionSourcePort::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Live, unbounded sequence of timestamped 3-axis readings.
pub trait MotionSourcePort {
    /// Start delivering samples every `interval_ms` to `callback`.
    fn subscribe(&mut self, interval_ms: u32, callback: SampleCallback) -> SubscriptionId;

    /// Stop delivery. The callback is never invoked again after this returns.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

// ───────────────────────────────────────────────────────────────
// Permission port (driven adapter: domain ↔ OS permission authority)
// ───────────────────────────────────────────────────────────────

/// Runtime permission gating the torch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Granted,
    Denied,
}

pub trait PermissionPort {
    /// Current status, without prompting.
    fn status(&self) -> PermissionStatus;

    /// Ask for the permission. May present a dialog and suspend until the
    /// user answers. A dismissed dialog resolves as `Denied` or `Unknown`.
    async fn request(&self) -> PermissionStatus;
}

// ───────────────────────────────────────────────────────────────
// Torch port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the torch.
///
/// Fire-and-forget: failures are the adapter's to log. The controller
/// assumes the command landed or that the next toggle corrects it.
pub trait TorchPort {
    async fn set_enabled(&self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (log, UI binding,
/// test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
