//! Torch controller — permission-gated, one-at-a-time torch toggling.
//!
//! Two sources race for the torch: shake events and the UI button. The
//! controller serialises them with a single in-flight flag. A toggle that
//! arrives while another is suspended (on the permission dialog or the
//! driver) is **dropped**, not queued and not retried.
//!
//! ```text
//!  request ──▶ in flight? ──yes──▶ Dropped (state unchanged)
//!                 │no
//!                 ▼
//!          permission granted? ──no──▶ request() ──denied──▶ PermissionDenied
//!                 │yes                    │granted
//!                 ▼◀──────────────────────┘
//!            flip is_on ──▶ TorchPort::set_enabled ──▶ Applied
//! ```
//!
//! State lives in a `Cell` and every method takes `&self`, so a shake
//! task and a UI task can both hold the controller on the same executor.
//! The in-flight flag is set before the first suspension point; two calls
//! entered back-to-back therefore see each other.

use core::cell::Cell;

use log::{debug, info, warn};

use super::ports::{PermissionPort, PermissionStatus, TorchPort};
use crate::error::TorchError;

/// Who asked for the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    Shake,
    Manual,
}

/// Observable torch state. Written only by [`TorchController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TorchState {
    pub is_on: bool,
    pub permission: PermissionStatus,
    pub toggle_in_flight: bool,
}

/// Detailed result of [`TorchController::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The torch was flipped; carries the new state.
    Applied(TorchState),
    /// Another toggle was in flight; carries the untouched state.
    Dropped(TorchState),
}

impl ToggleOutcome {
    pub fn state(&self) -> TorchState {
        match self {
            Self::Applied(s) | Self::Dropped(s) => *s,
        }
    }
}

pub struct TorchController<P, T> {
    permission: P,
    torch: T,
    state: Cell<TorchState>,
    detached: Cell<bool>,
}

impl<P: PermissionPort, T: TorchPort> TorchController<P, T> {
    /// Build a controller with the torch off. The cached permission is
    /// seeded from the authority's current status.
    pub fn new(permission: P, torch: T) -> Self {
        let state = TorchState {
            permission: permission.status(),
            ..TorchState::default()
        };
        Self {
            permission,
            torch,
            state: Cell::new(state),
            detached: Cell::new(false),
        }
    }

    /// Toggle on behalf of the UI.
    pub async fn request_toggle(&self) -> Result<TorchState, TorchError> {
        self.toggle(ToggleSource::Manual).await.map(|o| o.state())
    }

    /// Toggle on behalf of `source`, reporting whether it was applied or
    /// dropped.
    pub async fn toggle(&self, source: ToggleSource) -> Result<ToggleOutcome, TorchError> {
        if self.detached.get() {
            return Err(TorchError::Detached);
        }

        let mut state = self.state.get();
        if state.toggle_in_flight {
            debug!("torch: {:?} toggle dropped, another is in flight", source);
            return Ok(ToggleOutcome::Dropped(state));
        }
        state.toggle_in_flight = true;
        self.state.set(state);

        if state.permission != PermissionStatus::Granted {
            let status = self.acquire_permission().await;
            if self.detached.get() {
                debug!("torch: detached during permission request, result discarded");
                return Err(TorchError::Detached);
            }
            let mut s = self.state.get();
            s.permission = status;
            if status != PermissionStatus::Granted {
                s.toggle_in_flight = false;
                self.state.set(s);
                warn!("torch: permission denied ({:?} toggle)", source);
                return Err(TorchError::PermissionDenied);
            }
            self.state.set(s);
        }

        let mut s = self.state.get();
        s.is_on = !s.is_on;
        self.state.set(s);
        info!(
            "torch: {} ({:?})",
            if s.is_on { "ON" } else { "OFF" },
            source
        );

        self.torch.set_enabled(s.is_on).await;
        if self.detached.get() {
            return Err(TorchError::Detached);
        }

        let mut s = self.state.get();
        s.toggle_in_flight = false;
        self.state.set(s);
        Ok(ToggleOutcome::Applied(s))
    }

    /// Resolve to `Granted` or `Denied`; prompts only when not already granted.
    async fn acquire_permission(&self) -> PermissionStatus {
        if self.permission.status() == PermissionStatus::Granted {
            return PermissionStatus::Granted;
        }
        match self.permission.request().await {
            PermissionStatus::Granted => PermissionStatus::Granted,
            PermissionStatus::Denied | PermissionStatus::Unknown => PermissionStatus::Denied,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> TorchState {
        self.state.get()
    }

    pub fn is_on(&self) -> bool {
        self.state.get().is_on
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Stop accepting toggles. In-flight calls run to completion but
    /// discard their result.
    pub fn detach(&self) {
        self.detached.set(true);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }
}
