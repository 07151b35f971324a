//! # Telemetry Blackboard
//!
//! Thread-safe progress tracking for the term pipeline.
//! Uses atomic counters that the generator, the workers and the accumulator
//! bump without coordinating with each other.
//!
//! The blackboard pattern decouples work execution from progress reporting:
//! - Pipeline threads update atomic counters with minimal overhead
//! - A background heartbeat thread periodically reads and reports progress

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::error::Result;

/// Processing stage for high-level progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    Initializing = 0,
    Summing = 1,
    Joining = 2,
    Complete = 3,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initializing => "Initializing",
            Stage::Summing => "Summing",
            Stage::Joining => "Joining",
            Stage::Complete => "Complete",
        }
    }

    fn from_u64(val: u64) -> Self {
        match val {
            0 => Stage::Initializing,
            1 => Stage::Summing,
            2 => Stage::Joining,
            _ => Stage::Complete,
        }
    }
}

/// Global telemetry state - designed for cheap atomic updates from hot loops.
///
/// All fields use relaxed ordering since we only need eventual visibility,
/// not strict synchronization. The heartbeat thread reads approximate values.
pub struct TelemetryBlackboard {
    stage: AtomicU64,

    total_terms: AtomicU64,
    dispatched: AtomicU64,
    computed: AtomicU64,
    summed: AtomicU64,

    start_time: Instant,
    last_progress_nanos: AtomicU64,
}

impl TelemetryBlackboard {
    /// Create a new telemetry blackboard
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn set_stage(&self, stage: Stage) {
        self.stage.store(stage as u64, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::from_u64(self.stage.load(Ordering::Relaxed))
    }

    pub fn set_total_terms(&self, n: u64) {
        self.total_terms.store(n, Ordering::Relaxed);
    }

    /// An index left the generator.
    #[inline]
    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// A worker finished evaluating a term.
    #[inline]
    pub fn record_computed(&self) {
        self.computed.fetch_add(1, Ordering::Relaxed);
        self.touch_progress();
    }

    /// The accumulator received a term.
    #[inline]
    pub fn record_summed(&self) {
        self.summed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_terms(&self) -> u64 {
        self.total_terms.load(Ordering::Relaxed)
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn computed(&self) -> u64 {
        self.computed.load(Ordering::Relaxed)
    }

    pub fn summed(&self) -> u64 {
        self.summed.load(Ordering::Relaxed)
    }

    #[inline]
    fn touch_progress(&self) {
        let elapsed = self.start_time.elapsed().as_nanos() as u64;
        self.last_progress_nanos.store(elapsed, Ordering::Relaxed);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            stage: self.stage(),
            total_terms: self.total_terms(),
            dispatched: self.dispatched(),
            computed: self.computed(),
            summed: self.summed(),
            elapsed_secs: self.elapsed_secs(),
            last_progress_nanos: self.last_progress_nanos.load(Ordering::Relaxed),
            current_nanos: self.start_time.elapsed().as_nanos() as u64,
        }
    }
}

impl Default for TelemetryBlackboard {
    fn default() -> Self {
        Self {
            stage: AtomicU64::new(Stage::Initializing as u64),
            total_terms: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            computed: AtomicU64::new(0),
            summed: AtomicU64::new(0),
            start_time: Instant::now(),
            last_progress_nanos: AtomicU64::new(0),
        }
    }
}

/// Snapshot of telemetry state at a point in time
struct TelemetrySnapshot {
    stage: Stage,
    total_terms: u64,
    dispatched: u64,
    computed: u64,
    summed: u64,
    elapsed_secs: f64,
    last_progress_nanos: u64,
    current_nanos: u64,
}

/// Heartbeat output configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between heartbeats
    pub interval: Duration,
    /// Stall warning threshold (no term computed for this long)
    pub stall_threshold: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            stall_threshold: Duration::from_secs(300),
        }
    }
}

/// Handle to the heartbeat thread
pub struct HeartbeatHandle {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<Sender<()>>,
}

impl HeartbeatHandle {
    /// Spawn the heartbeat thread
    pub fn spawn(blackboard: Arc<TelemetryBlackboard>, config: HeartbeatConfig) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let is_tty = io::stderr().is_terminal();

        let handle = thread::Builder::new()
            .name("heartbeat".to_string())
            .spawn(move || {
                let mut last_computed = 0u64;
                let mut last_time = Instant::now();
                loop {
                    match shutdown_rx.recv_timeout(config.interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    let snap = blackboard.snapshot();
                    let now = Instant::now();
                    let dt = now.duration_since(last_time).as_secs_f64();
                    let velocity = if dt > 0.1 {
                        snap.computed.saturating_sub(last_computed) as f64 / dt
                    } else {
                        0.0
                    };
                    last_computed = snap.computed;
                    last_time = now;

                    let eta = eta_string(&snap, velocity);
                    let stall_nanos = snap.current_nanos.saturating_sub(snap.last_progress_nanos);
                    let is_stalled = stall_nanos > config.stall_threshold.as_nanos() as u64;

                    if is_tty {
                        print_tty_progress(&snap, &eta, velocity, is_stalled);
                    } else {
                        print_log_progress(&snap, &eta, velocity, is_stalled);
                    }
                }

                // Clear TTY line on shutdown
                if is_tty {
                    eprint!("\r\x1b[K");
                    let _ = io::stderr().flush();
                }
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown: Some(shutdown_tx),
        })
    }

    /// Signal shutdown and wait for thread to finish
    pub fn shutdown(mut self) {
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        // Dropping the sender wakes the heartbeat; don't block in drop
        self.shutdown.take();
    }
}

fn eta_string(snap: &TelemetrySnapshot, velocity: f64) -> String {
    if velocity > 0.0 && snap.total_terms > snap.computed {
        let remaining = snap.total_terms - snap.computed;
        format_duration(remaining as f64 / velocity)
    } else {
        "unknown".to_string()
    }
}

/// Format duration in human-readable form
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{:.0}m{:.0}s", mins, remaining_secs)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

fn progress_pct(snap: &TelemetrySnapshot) -> f64 {
    if snap.total_terms > 0 {
        (snap.summed as f64 / snap.total_terms as f64 * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Print progress for TTY (rewriting single line)
fn print_tty_progress(snap: &TelemetrySnapshot, eta: &str, velocity: f64, is_stalled: bool) {
    let pct = progress_pct(snap);
    let bar_width = 20;
    let filled = ((pct / 100.0) * bar_width as f64) as usize;
    let bar: String =
        "=".repeat(filled.min(bar_width)) + &" ".repeat(bar_width.saturating_sub(filled));
    let stall_str = if is_stalled { " [STALLED]" } else { "" };

    eprint!(
        "\r[{}] {:>5.1}% | {} T{}/{} | {:.0} terms/s | {} | ETA: {}{}    \x1b[K",
        bar,
        pct,
        snap.stage.as_str(),
        snap.summed,
        snap.total_terms,
        velocity,
        format_duration(snap.elapsed_secs),
        eta,
        stall_str
    );
    let _ = io::stderr().flush();
}

/// Print progress for non-TTY (structured log line)
fn print_log_progress(snap: &TelemetrySnapshot, eta: &str, velocity: f64, is_stalled: bool) {
    eprintln!(
        "[HEARTBEAT] stage=\"{}\" dispatched={}/{} computed={}/{} summed={}/{} \
         velocity={:.0}/s elapsed={:.0}s eta={} stalled={}",
        snap.stage.as_str(),
        snap.dispatched,
        snap.total_terms,
        snap.computed,
        snap.total_terms,
        snap.summed,
        snap.total_terms,
        velocity,
        snap.elapsed_secs,
        eta,
        is_stalled
    );
}
