//! ShakeTorch — host replay tool.
//!
//! Replays a recorded motion trace through a full [`LightingSession`]
//! wired to host adapters, and logs what the torch would have done.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  ReplayMotionSource   PolicyPermission   HardwareTorch<LogPin>│
//! │  (MotionSourcePort)   (PermissionPort)   (TorchPort)          │
//! │                        LogEventSink (EventSink)               │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │   LightingSession: ShakeDetector · TorchController     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use shaketorch::adapters::hardware::{HardwareTorch, LogPin};
use shaketorch::adapters::log_sink::LogEventSink;
use shaketorch::adapters::permission::{PermissionPolicy, PolicyPermission};
use shaketorch::adapters::replay::ReplayMotionSource;
use shaketorch::adapters::trace::{TraceEntry, read_trace};
use shaketorch::app::service::{LightingSession, SessionExecutor};
use shaketorch::app::torch::TorchController;
use shaketorch::config::SessionConfig;

type ReplaySession =
    LightingSession<ReplayMotionSource, PolicyPermission, HardwareTorch<LogPin>, LogEventSink>;

/// Replay a motion trace through the shake-to-torch session.
#[derive(Parser, Debug)]
#[command(name = "shaketorch", version, about)]
struct Args {
    /// JSON-lines trace to replay
    #[arg(long)]
    trace: PathBuf,

    /// JSON session config; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the shake magnitude threshold
    #[arg(long)]
    threshold: Option<f32>,

    /// Override the number of peaks that make a shake
    #[arg(long)]
    peaks: Option<u8>,

    /// Answer the permission dialog with "deny"
    #[arg(long)]
    deny: bool,

    /// Simulated permission dialog latency in milliseconds
    #[arg(long, default_value_t = 0)]
    dialog_ms: u64,

    /// Enable shake detection before the first trace entry
    #[arg(long)]
    shake_enabled: bool,

    /// Replay as fast as possible instead of following timestamps
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("ShakeTorch v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config + trace ─────────────────────────────────────
    let config = load_config(&args)?;
    let file = File::open(&args.trace)
        .with_context(|| format!("opening trace {}", args.trace.display()))?;
    let trace = read_trace(BufReader::new(file)).context("reading trace")?;
    info!("Trace: {} entries from {}", trace.len(), args.trace.display());

    // ── 2. Adapters ───────────────────────────────────────────
    let policy = if args.deny {
        PermissionPolicy::Deny
    } else {
        PermissionPolicy::Grant
    };
    let permission = PolicyPermission::new(policy, Duration::from_millis(args.dialog_ms));
    let torch = TorchController::new(permission, HardwareTorch::new(LogPin::new()));
    let motion = ReplayMotionSource::new();
    let executor = Rc::new(SessionExecutor::new());

    // ── 3. Session ────────────────────────────────────────────
    let mut session = LightingSession::open(
        config,
        motion.clone(),
        torch,
        LogEventSink::new(),
        executor.clone(),
    )
    .context("opening session")?;
    if args.shake_enabled {
        session.set_detection_enabled(true);
    }

    // ── 4. Replay ─────────────────────────────────────────────
    futures_lite::future::block_on(replay(&session, &motion, &executor, &trace, args.fast));

    let m = session.metrics();
    let torch_on = session.torch_state().is_on;
    session.close();

    info!(
        "Summary: samples={} shakes={} toggles={} dropped={} denied={} torch={}",
        m.samples_processed,
        m.shakes_detected,
        m.toggles_applied,
        m.toggles_dropped,
        m.permission_denials,
        if torch_on { "ON" } else { "OFF" },
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.shake.threshold = threshold;
    }
    if let Some(peaks) = args.peaks {
        config.shake.required_peaks = peaks;
    }
    config.validate()?;
    Ok(config)
}

/// Feed the trace into the session, running spawned toggles between
/// entries.
async fn replay(
    session: &ReplaySession,
    motion: &ReplayMotionSource,
    executor: &SessionExecutor,
    trace: &[TraceEntry],
    fast: bool,
) {
    let mut last_ts = None;
    for entry in trace {
        let ts = entry.timestamp_ms();
        if let Some(prev) = last_ts {
            let gap = ts.saturating_sub(prev);
            if !fast && gap > 0 {
                async_io_mini::Timer::after(Duration::from_millis(gap)).await;
            }
        }
        last_ts = Some(ts);

        match entry {
            TraceEntry::Sample(sample) => motion.deliver(*sample),
            other => {
                if let Some(cmd) = other.command() {
                    session.handle_command(cmd);
                }
            }
        }
        while executor.try_tick() {}
    }

    // Let the last toggle settle (a dialog may still be open).
    while session.toggle_pending() {
        async_io_mini::Timer::after(Duration::from_millis(10)).await;
        while executor.try_tick() {}
    }
}
