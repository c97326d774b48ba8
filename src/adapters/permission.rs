//! Policy-driven permission authority.
//!
//! Implements [`PermissionPort`] for hosts without a real permission
//! dialog. Every request is answered with a fixed policy, optionally after
//! a simulated dialog delay so the in-flight window is observable.

use core::cell::Cell;
use core::time::Duration;

use log::info;

use crate::app::ports::{PermissionPort, PermissionStatus};

/// How the simulated user answers the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPolicy {
    Grant,
    Deny,
}

pub struct PolicyPermission {
    policy: PermissionPolicy,
    dialog_delay: Duration,
    status: Cell<PermissionStatus>,
    prompts: Cell<u32>,
}

impl PolicyPermission {
    /// Start in `Unknown`; the first request shows the "dialog".
    pub fn new(policy: PermissionPolicy, dialog_delay: Duration) -> Self {
        Self {
            policy,
            dialog_delay,
            status: Cell::new(PermissionStatus::Unknown),
            prompts: Cell::new(0),
        }
    }

    /// Number of dialogs shown so far.
    pub fn prompts(&self) -> u32 {
        self.prompts.get()
    }
}

impl PermissionPort for PolicyPermission {
    fn status(&self) -> PermissionStatus {
        self.status.get()
    }

    async fn request(&self) -> PermissionStatus {
        self.prompts.set(self.prompts.get() + 1);
        info!("PERM  | dialog shown ({:?})", self.policy);
        if !self.dialog_delay.is_zero() {
            async_io_mini::Timer::after(self.dialog_delay).await;
        }
        let answer = match self.policy {
            PermissionPolicy::Grant => PermissionStatus::Granted,
            PermissionPolicy::Deny => PermissionStatus::Denied,
        };
        self.status.set(answer);
        answer
    }
}
