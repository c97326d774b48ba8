//! Replay motion source.
//!
//! Implements [`MotionSourcePort`] over samples pushed in by the caller,
//! typically read from a recorded trace. The handle is cheaply cloneable:
//! one clone goes into the session, another stays with whoever feeds it.
//!
//! Timestamps come from the samples themselves; the subscription interval
//! is recorded but pacing is the feeder's job.

use core::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::app::ports::{MotionSourcePort, SampleCallback, SubscriptionId};
use crate::sensors::MotionSample;

struct Subscriber {
    id: SubscriptionId,
    interval_ms: u32,
    callback: SampleCallback,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    subscribers: Vec<Subscriber>,
    delivered: u64,
}

#[derive(Clone, Default)]
pub struct ReplayMotionSource {
    inner: Rc<RefCell<Inner>>,
}

impl ReplayMotionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand `sample` to every live subscription, in subscription order.
    ///
    /// Callbacks must not subscribe or unsubscribe on this source.
    pub fn deliver(&self, sample: MotionSample) {
        let mut inner = self.inner.borrow_mut();
        inner.delivered += 1;
        for sub in &mut inner.subscribers {
            (sub.callback)(sample);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Interval requested by the newest live subscription.
    pub fn requested_interval_ms(&self) -> Option<u32> {
        self.inner.borrow().subscribers.last().map(|s| s.interval_ms)
    }

    /// Samples delivered so far, subscribed or not.
    pub fn delivered(&self) -> u64 {
        self.inner.borrow().delivered
    }
}

impl MotionSourcePort for ReplayMotionSource {
    fn subscribe(&mut self, interval_ms: u32, callback: SampleCallback) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.subscribers.push(Subscriber {
            id,
            interval_ms,
            callback,
        });
        debug!("replay: subscription {:?} at {}ms", id, interval_ms);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.inner.borrow_mut().subscribers.retain(|s| s.id != id);
        debug!("replay: subscription {:?} released", id);
    }
}
