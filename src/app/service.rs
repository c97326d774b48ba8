//! Lighting session — the per-screen composition of detector and torch.
//!
//! [`LightingSession`] owns the motion subscription, the shake detector,
//! and the torch controller for one screen instance. It exists from
//! [`open`](LightingSession::open) until [`close`](LightingSession::close)
//! (or drop).
//!
//! ```text
//!  MotionSourcePort ──callback──▶ ShakeDetector (sync reducer)
//!                                      │ ShakeEvent
//!                                      ▼ spawn, never awaited
//!  UiCommand / request_toggle ──▶ TorchController ──▶ TorchPort
//!                                      │
//!                                      ▼
//!                              EventSink + SessionMetrics
//! ```
//!
//! The sample callback never waits on the torch: shake toggles are
//! spawned on a single-threaded executor, so a slow permission dialog
//! cannot starve sample processing. At most one toggle task exists at a
//! time. A toggle requested while one is pending (spawned, not yet
//! finished) is dropped at the call site, so the executor queue never
//! holds a backlog of flips.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use edge_executor::LocalExecutor;
use log::{debug, info};

use crate::config::SessionConfig;
use crate::diagnostics::{MetricsSnapshot, SessionMetrics, TOGGLE_HISTORY, ToggleRecord};
use crate::error::{ConfigError, TorchError};
use crate::sensors::shake::{DetectorState, ShakeDetector};

use super::commands::UiCommand;
use super::events::AppEvent;
use super::ports::{
    EventSink, MotionSourcePort, PermissionPort, SampleCallback, SubscriptionId, TorchPort,
};
use super::torch::{ToggleOutcome, ToggleSource, TorchController, TorchState};

/// Executor that runs spawned toggles. Shared between the session and
/// whoever drives it.
pub type SessionExecutor = LocalExecutor<'static, 16>;

// ───────────────────────────────────────────────────────────────
// Outbox: event fan-out + metrics
// ───────────────────────────────────────────────────────────────

struct Outbox<S> {
    sink: S,
    metrics: SessionMetrics,
}

impl<S: EventSink> Outbox<S> {
    fn publish(&mut self, event: AppEvent) {
        self.metrics.record(&event);
        self.sink.emit(&event);
    }

    fn report(&mut self, source: ToggleSource, result: &Result<ToggleOutcome, TorchError>) {
        match result {
            Ok(ToggleOutcome::Applied(s)) => self.publish(AppEvent::TorchSwitched {
                is_on: s.is_on,
                source,
            }),
            Ok(ToggleOutcome::Dropped(_)) => self.publish(AppEvent::ToggleDropped(source)),
            Err(TorchError::PermissionDenied) => self.publish(AppEvent::PermissionDenied(source)),
            Err(TorchError::Detached) => {
                debug!("session: {:?} toggle finished after close, discarded", source);
            }
        }
    }
}

type SharedOutbox<S> = Rc<RefCell<Outbox<S>>>;

/// Everything a spawned toggle needs.
struct ToggleLane<P, T, S> {
    torch: Rc<TorchController<P, T>>,
    outbox: SharedOutbox<S>,
    executor: Rc<SessionExecutor>,
    /// Set while a toggle task is spawned and unfinished.
    pending: Rc<Cell<bool>>,
}

impl<P, T, S> Clone for ToggleLane<P, T, S> {
    fn clone(&self) -> Self {
        Self {
            torch: self.torch.clone(),
            outbox: self.outbox.clone(),
            executor: self.executor.clone(),
            pending: self.pending.clone(),
        }
    }
}

impl<P, T, S> ToggleLane<P, T, S>
where
    P: PermissionPort + 'static,
    T: TorchPort + 'static,
    S: EventSink + 'static,
{
    /// True when a new toggle would overlap one already under way.
    fn busy(&self) -> bool {
        self.pending.get() || self.torch.state().toggle_in_flight
    }

    /// Spawn a toggle for `source`, or drop it if one is already under way.
    fn spawn(&self, source: ToggleSource) {
        if self.busy() {
            debug!("session: {:?} toggle dropped, one is pending", source);
            self.outbox
                .borrow_mut()
                .publish(AppEvent::ToggleDropped(source));
            return;
        }
        self.pending.set(true);

        let torch = self.torch.clone();
        let outbox = self.outbox.clone();
        let pending = self.pending.clone();
        self.executor
            .spawn(async move {
                let result = torch.toggle(source).await;
                pending.set(false);
                outbox.borrow_mut().report(source, &result);
            })
            .detach();
    }
}

// ───────────────────────────────────────────────────────────────
// LightingSession
// ───────────────────────────────────────────────────────────────

pub struct LightingSession<M, P, T, S>
where
    M: MotionSourcePort,
    P: PermissionPort + 'static,
    T: TorchPort + 'static,
    S: EventSink + 'static,
{
    motion: M,
    subscription: Option<SubscriptionId>,
    config: SessionConfig,
    detector: Rc<RefCell<ShakeDetector>>,
    lane: ToggleLane<P, T, S>,
}

impl<M, P, T, S> LightingSession<M, P, T, S>
where
    M: MotionSourcePort,
    P: PermissionPort + 'static,
    T: TorchPort + 'static,
    S: EventSink + 'static,
{
    /// Validate `config`, subscribe to `motion`, and start the session.
    ///
    /// Shake detection starts disabled; the UI turns it on.
    pub fn open(
        config: SessionConfig,
        mut motion: M,
        torch: TorchController<P, T>,
        sink: S,
        executor: Rc<SessionExecutor>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let detector = Rc::new(RefCell::new(ShakeDetector::new(config.shake)));
        let torch = Rc::new(torch);
        let outbox = Rc::new(RefCell::new(Outbox {
            sink,
            metrics: SessionMetrics::new(),
        }));

        let lane = ToggleLane {
            torch,
            outbox: outbox.clone(),
            executor,
            pending: Rc::new(Cell::new(false)),
        };

        let callback = sample_handler(detector.clone(), lane.clone());
        let subscription = motion.subscribe(config.sample_interval_ms, callback);

        outbox.borrow_mut().publish(AppEvent::SessionOpened {
            interval_ms: config.sample_interval_ms,
        });
        info!(
            "session: opened (interval={}ms, threshold={:.1}, debounce={}ms, window={}ms, peaks={})",
            config.sample_interval_ms,
            config.shake.threshold,
            config.shake.debounce_ms,
            config.shake.peak_window_ms,
            config.shake.required_peaks,
        );

        Ok(Self {
            motion,
            subscription: Some(subscription),
            config,
            detector,
            lane,
        })
    }

    // ── UI commands ───────────────────────────────────────────

    /// Switch shake detection on or off. Touches neither the torch nor
    /// the permission.
    pub fn set_detection_enabled(&self, enabled: bool) {
        self.detector.borrow_mut().set_enabled(enabled);
        self.lane
            .outbox
            .borrow_mut()
            .publish(AppEvent::DetectionChanged(enabled));
        info!(
            "session: shake detection {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Manual toggle, awaited by the caller.
    ///
    /// Dropped (current state returned) if a spawned toggle has not
    /// finished yet.
    pub async fn request_toggle(&self) -> Result<TorchState, TorchError> {
        let lane = &self.lane;
        if lane.pending.get() && !lane.torch.is_detached() {
            let result = Ok(ToggleOutcome::Dropped(lane.torch.state()));
            lane.outbox
                .borrow_mut()
                .report(ToggleSource::Manual, &result);
            return result.map(|o| o.state());
        }
        let result = lane.torch.toggle(ToggleSource::Manual).await;
        lane.outbox
            .borrow_mut()
            .report(ToggleSource::Manual, &result);
        result.map(|o| o.state())
    }

    /// Process a UI command. `Toggle` is spawned on the session executor
    /// rather than awaited, or dropped if a toggle is already under way.
    pub fn handle_command(&self, cmd: UiCommand) {
        match cmd {
            UiCommand::Toggle => self.lane.spawn(ToggleSource::Manual),
            UiCommand::SetDetectionEnabled(enabled) => self.set_detection_enabled(enabled),
        }
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Release the motion subscription and detach the torch controller.
    ///
    /// In-flight toggles finish but their results are discarded. Calling
    /// this more than once is a no-op.
    pub fn close(&mut self) {
        let Some(id) = self.subscription.take() else {
            return;
        };
        self.motion.unsubscribe(id);
        self.lane.torch.detach();
        self.lane
            .outbox
            .borrow_mut()
            .publish(AppEvent::SessionClosed);
        info!("session: closed");
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn detection_enabled(&self) -> bool {
        self.detector.borrow().is_enabled()
    }

    pub fn detector_state(&self) -> DetectorState {
        self.detector.borrow().state()
    }

    pub fn torch_state(&self) -> TorchState {
        self.lane.torch.state()
    }

    /// True from the moment a toggle task is spawned until it finishes.
    pub fn toggle_pending(&self) -> bool {
        self.lane.pending.get()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.lane.outbox.borrow().metrics.snapshot()
    }

    /// Recent applied toggles, oldest first.
    pub fn recent_toggles(&self) -> heapless::Vec<ToggleRecord, TOGGLE_HISTORY> {
        self.lane.outbox.borrow().metrics.recent_toggles()
    }
}

impl<M, P, T, S> Drop for LightingSession<M, P, T, S>
where
    M: MotionSourcePort,
    P: PermissionPort + 'static,
    T: TorchPort + 'static,
    S: EventSink + 'static,
{
    fn drop(&mut self) {
        self.close();
    }
}

// ── Internal ──────────────────────────────────────────────────

/// Build the motion callback: run the reducer, and on a shake spawn a
/// toggle without waiting for it.
fn sample_handler<P, T, S>(
    detector: Rc<RefCell<ShakeDetector>>,
    lane: ToggleLane<P, T, S>,
) -> SampleCallback
where
    P: PermissionPort + 'static,
    T: TorchPort + 'static,
    S: EventSink + 'static,
{
    Box::new(move |sample| {
        lane.outbox.borrow_mut().metrics.record_sample();
        let Some(shake) = detector.borrow_mut().on_sample(&sample) else {
            return;
        };
        lane.outbox
            .borrow_mut()
            .publish(AppEvent::ShakeDetected(shake));
        lane.spawn(ToggleSource::Shake);
    })
}
