//! LightingSession integration tests.
//!
//! Drives a full session (detector, controller, executor) through the
//! replay motion source and the mock permission/torch adapters.

use std::rc::Rc;

use futures_lite::future::block_on;

use shaketorch::adapters::replay::ReplayMotionSource;
use shaketorch::app::commands::UiCommand;
use shaketorch::app::events::AppEvent;
use shaketorch::app::ports::PermissionStatus;
use shaketorch::app::service::{LightingSession, SessionExecutor};
use shaketorch::app::torch::{ToggleSource, TorchController};
use shaketorch::config::SessionConfig;
use shaketorch::diagnostics::ToggleRecord;
use shaketorch::error::{ConfigError, TorchError};

use crate::mock_hw::{MockPermission, MockTorch, RecordingSink, drain, jolt, rest};

type TestSession = LightingSession<ReplayMotionSource, MockPermission, MockTorch, RecordingSink>;

struct Rig {
    session: TestSession,
    motion: ReplayMotionSource,
    permission: MockPermission,
    torch: MockTorch,
    sink: RecordingSink,
    executor: Rc<SessionExecutor>,
}

fn rig(permission: MockPermission) -> Rig {
    let motion = ReplayMotionSource::new();
    let torch = MockTorch::new();
    let sink = RecordingSink::new();
    let executor = Rc::new(SessionExecutor::new());
    let controller = TorchController::new(permission.clone(), torch.clone());
    let session = LightingSession::open(
        SessionConfig::default(),
        motion.clone(),
        controller,
        sink.clone(),
        executor.clone(),
    )
    .unwrap();
    Rig {
        session,
        motion,
        permission,
        torch,
        sink,
        executor,
    }
}

impl Rig {
    fn shake_at(&self, t0: u64) {
        self.motion.deliver(jolt(t0));
        self.motion.deliver(jolt(t0 + 300));
        drain(&self.executor);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn open_subscribes_at_sample_interval() {
    let r = rig(MockPermission::granted());

    assert!(r.session.is_open());
    assert_eq!(r.motion.subscriber_count(), 1);
    assert_eq!(r.motion.requested_interval_ms(), Some(160));
    assert_eq!(
        r.sink.events(),
        vec![AppEvent::SessionOpened { interval_ms: 160 }]
    );
    assert!(!r.session.detection_enabled(), "detection starts disabled");
    assert!(!r.session.torch_state().is_on);
    assert_eq!(r.session.config(), &SessionConfig::default());
}

#[test]
fn invalid_config_is_rejected_before_subscribing() {
    let motion = ReplayMotionSource::new();
    let mut config = SessionConfig::default();
    config.shake.threshold = 0.0;

    let result = LightingSession::open(
        config,
        motion.clone(),
        TorchController::new(MockPermission::granted(), MockTorch::new()),
        RecordingSink::new(),
        Rc::new(SessionExecutor::new()),
    );

    let Err(err) = result else {
        panic!("zero threshold must be rejected");
    };
    assert!(matches!(err, ConfigError::ValidationFailed(_)));
    assert_eq!(motion.subscriber_count(), 0);
}

#[test]
fn close_is_idempotent_and_stops_samples() {
    let mut r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);

    r.session.close();
    r.session.close();

    assert!(!r.session.is_open());
    assert_eq!(r.motion.subscriber_count(), 0);
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::SessionClosed)),
        1
    );

    r.shake_at(0);
    assert_eq!(r.session.metrics().samples_processed, 0);
    assert!(r.torch.calls().is_empty());
}

#[test]
fn drop_releases_subscription() {
    let r = rig(MockPermission::granted());
    let motion = r.motion.clone();
    assert_eq!(motion.subscriber_count(), 1);

    drop(r.session);
    assert_eq!(motion.subscriber_count(), 0);
}

// ── Shake path ────────────────────────────────────────────────

#[test]
fn shake_toggles_torch_when_enabled() {
    let r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);

    r.shake_at(0);

    assert_eq!(r.torch.calls(), vec![true]);
    assert!(r.session.torch_state().is_on);
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::ShakeDetected(s) if s.at_ms == 300 && s.peaks == 2)),
        1
    );
    assert!(r.sink.events().contains(&AppEvent::TorchSwitched {
        is_on: true,
        source: ToggleSource::Shake,
    }));

    let m = r.session.metrics();
    assert_eq!(m.samples_processed, 2);
    assert_eq!(m.shakes_detected, 1);
    assert_eq!(m.toggles_applied, 1);
}

#[test]
fn disabled_detection_ignores_shakes() {
    let r = rig(MockPermission::granted());

    r.shake_at(0);

    assert!(r.torch.calls().is_empty());
    assert_eq!(r.session.detector_state().peak_count, 0);
    assert_eq!(r.session.metrics().samples_processed, 2);
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::ShakeDetected(_))),
        0
    );
}

#[test]
fn quiet_samples_never_toggle() {
    let r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);

    for i in 0..50 {
        r.motion.deliver(rest(i * 160));
    }
    drain(&r.executor);

    assert!(r.torch.calls().is_empty());
    assert_eq!(r.session.metrics().samples_processed, 50);
}

#[test]
fn second_shake_inside_cooldown_is_ignored() {
    let r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);

    r.shake_at(0);
    // 600ms after the trigger: still cooling down.
    r.motion.deliver(jolt(900));
    r.motion.deliver(jolt(1000));
    drain(&r.executor);
    assert_eq!(r.torch.calls(), vec![true]);

    // Cooldown over: a fresh two-peak shake flips the torch back off.
    r.motion.deliver(jolt(1301));
    r.motion.deliver(jolt(1500));
    drain(&r.executor);
    assert_eq!(r.torch.calls(), vec![true, false]);
    assert!(!r.session.torch_state().is_on);
}

#[test]
fn disabling_detection_leaves_torch_alone() {
    let r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);
    r.shake_at(0);
    assert!(r.session.torch_state().is_on);

    r.session.handle_command(UiCommand::SetDetectionEnabled(false));

    assert!(!r.session.detection_enabled());
    assert!(r.session.torch_state().is_on);
    assert_eq!(r.torch.calls(), vec![true]);
    assert_eq!(r.sink.events().last(), Some(&AppEvent::DetectionChanged(false)));
}

// ── Manual path ───────────────────────────────────────────────

#[test]
fn manual_toggles_alternate_and_are_recorded() {
    let r = rig(MockPermission::granted());

    let on = block_on(r.session.request_toggle()).unwrap();
    assert!(on.is_on);
    let off = block_on(r.session.request_toggle()).unwrap();
    assert!(!off.is_on);

    assert_eq!(r.torch.calls(), vec![true, false]);
    assert_eq!(r.permission.requests(), 0);
    assert_eq!(
        r.session.recent_toggles().as_slice(),
        &[
            ToggleRecord {
                source: ToggleSource::Manual,
                is_on: true
            },
            ToggleRecord {
                source: ToggleSource::Manual,
                is_on: false
            },
        ]
    );
}

#[test]
fn toggle_command_runs_on_executor() {
    let r = rig(MockPermission::granted());

    r.session.handle_command(UiCommand::Toggle);
    assert!(r.torch.calls().is_empty(), "spawned, not run inline");

    drain(&r.executor);
    assert_eq!(r.torch.calls(), vec![true]);
    assert!(r.sink.events().contains(&AppEvent::TorchSwitched {
        is_on: true,
        source: ToggleSource::Manual,
    }));
}

#[test]
fn first_toggle_prompts_then_remembers_grant() {
    let r = rig(MockPermission::answering(PermissionStatus::Granted));

    block_on(r.session.request_toggle()).unwrap();
    block_on(r.session.request_toggle()).unwrap();

    assert_eq!(r.permission.requests(), 1);
    assert_eq!(r.session.torch_state().permission, PermissionStatus::Granted);
    assert_eq!(r.torch.calls(), vec![true, false]);
}

#[test]
fn denied_permission_surfaces_guidance() {
    let r = rig(MockPermission::answering(PermissionStatus::Denied));

    let result = block_on(r.session.request_toggle());

    assert_eq!(result, Err(TorchError::PermissionDenied));
    assert!(
        TorchError::PermissionDenied
            .to_string()
            .contains("camera permission")
    );
    let s = r.session.torch_state();
    assert!(!s.is_on);
    assert!(!s.toggle_in_flight);
    assert_eq!(s.permission, PermissionStatus::Denied);
    assert!(r.torch.calls().is_empty());
    assert!(r
        .sink
        .events()
        .contains(&AppEvent::PermissionDenied(ToggleSource::Manual)));
    assert_eq!(r.session.metrics().permission_denials, 1);
}

#[test]
fn denied_shake_toggle_reports_shake_source() {
    let r = rig(MockPermission::answering(PermissionStatus::Denied));
    r.session.set_detection_enabled(true);

    r.shake_at(0);

    assert!(r.torch.calls().is_empty());
    assert!(r
        .sink
        .events()
        .contains(&AppEvent::PermissionDenied(ToggleSource::Shake)));
}

// ── Concurrency ───────────────────────────────────────────────

#[test]
fn shake_during_open_dialog_is_dropped() {
    let r = rig(MockPermission::gated());
    r.session.set_detection_enabled(true);

    r.session.handle_command(UiCommand::Toggle);
    drain(&r.executor);
    assert!(r.session.torch_state().toggle_in_flight);

    // Samples keep flowing while the dialog is open.
    r.shake_at(0);
    assert_eq!(r.session.metrics().samples_processed, 2);
    assert!(r
        .sink
        .events()
        .contains(&AppEvent::ToggleDropped(ToggleSource::Shake)));

    r.permission.answer(PermissionStatus::Granted);
    drain(&r.executor);

    assert_eq!(r.permission.requests(), 1);
    assert_eq!(r.torch.calls(), vec![true]);
    let s = r.session.torch_state();
    assert!(s.is_on);
    assert!(!s.toggle_in_flight);

    let m = r.session.metrics();
    assert_eq!(m.toggles_applied, 1);
    assert_eq!(m.toggles_dropped, 1);
}

#[test]
fn two_toggle_commands_in_one_tick_flip_once() {
    let r = rig(MockPermission::granted());

    r.session.handle_command(UiCommand::Toggle);
    assert!(r.session.toggle_pending());
    r.session.handle_command(UiCommand::Toggle);
    drain(&r.executor);

    assert_eq!(r.torch.calls(), vec![true]);
    assert!(!r.session.toggle_pending());
    assert_eq!(
        r.sink
            .count(|e| matches!(e, AppEvent::ToggleDropped(ToggleSource::Manual))),
        1
    );
    let m = r.session.metrics();
    assert_eq!(m.toggles_applied, 1);
    assert_eq!(m.toggles_dropped, 1);
}

#[test]
fn shake_and_button_in_one_tick_flip_once() {
    let r = rig(MockPermission::granted());
    r.session.set_detection_enabled(true);

    r.motion.deliver(jolt(0));
    r.motion.deliver(jolt(300));
    r.session.handle_command(UiCommand::Toggle);
    drain(&r.executor);

    assert_eq!(r.torch.calls(), vec![true]);
    assert!(r.sink.events().contains(&AppEvent::TorchSwitched {
        is_on: true,
        source: ToggleSource::Shake,
    }));
    assert_eq!(
        r.sink.count(|e| matches!(e, AppEvent::ToggleDropped(_))),
        1
    );
    assert!(r
        .sink
        .events()
        .contains(&AppEvent::ToggleDropped(ToggleSource::Manual)));
}

#[test]
fn toggle_burst_without_ticking_keeps_one_task() {
    let r = rig(MockPermission::granted());

    // More presses than the executor queue holds.
    for _ in 0..40 {
        r.session.handle_command(UiCommand::Toggle);
    }
    drain(&r.executor);

    assert_eq!(r.torch.calls(), vec![true]);
    assert_eq!(r.session.metrics().toggles_dropped, 39);

    // The lane is free again once the task finished.
    r.session.handle_command(UiCommand::Toggle);
    drain(&r.executor);
    assert_eq!(r.torch.calls(), vec![true, false]);
}

#[test]
fn awaited_toggle_while_spawned_one_pending_is_dropped() {
    let r = rig(MockPermission::granted());

    r.session.handle_command(UiCommand::Toggle);
    let state = block_on(r.session.request_toggle()).unwrap();
    assert!(!state.is_on, "spawned toggle has not run yet");
    assert!(r
        .sink
        .events()
        .contains(&AppEvent::ToggleDropped(ToggleSource::Manual)));

    drain(&r.executor);
    assert_eq!(r.torch.calls(), vec![true]);
}

#[test]
fn close_during_dialog_discards_late_grant() {
    let mut r = rig(MockPermission::gated());

    r.session.handle_command(UiCommand::Toggle);
    drain(&r.executor);
    r.session.close();
    r.sink.clear();

    r.permission.answer(PermissionStatus::Granted);
    drain(&r.executor);

    assert!(r.torch.calls().is_empty());
    assert!(!r.session.torch_state().is_on);
    assert!(r.sink.events().is_empty(), "nothing published after close");
}

#[test]
fn toggle_after_close_is_rejected() {
    let mut r = rig(MockPermission::granted());
    r.session.close();

    assert_eq!(
        block_on(r.session.request_toggle()),
        Err(TorchError::Detached)
    );
    assert!(r.torch.calls().is_empty());
}
