//! Transient per-session metrics: duration, call count, activity feed.
//!
//! Elapsed time is read from a monotonic clock whenever it is asked for. The
//! once-per-second ticker only publishes the formatted duration on a watch
//! channel so a UI knows when to redraw.

use chrono::Local;
use portal_core::lifecycle::SessionObserver;
use portal_core::telemetry::{
    ActivityEntry, ActivityLog, PerformanceSample, PerformanceSnapshot, SessionStats,
    format_duration,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const APPLICATION_STARTED: &str = "Application started";
const SESSION_STARTED: &str = "User session started";
const SESSION_ENDED: &str = "User session ended";
const LOG_CLEARED: &str = "Activity log cleared";

#[derive(Default)]
struct TelemetryState {
    started_at: Option<Instant>,
    /// Set by `stop`; elapsed no longer advances afterwards
    stopped_elapsed: Option<Duration>,
    login_time: String,
    call_count: u64,
    activity: ActivityLog,
    performance: PerformanceSnapshot,
    ticker: Option<CancellationToken>,
}

impl TelemetryState {
    fn elapsed(&self) -> Duration {
        match (self.started_at, self.stopped_elapsed) {
            (_, Some(frozen)) => frozen,
            (Some(started_at), None) => started_at.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    fn cancel_ticker(&mut self) -> bool {
        match self.ticker.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Session telemetry container. Nothing here is persisted.
pub struct SessionTelemetry {
    state: Arc<Mutex<TelemetryState>>,
    ticks: Arc<watch::Sender<String>>,
}

impl Default for SessionTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTelemetry {
    pub fn new() -> Self {
        let mut state = TelemetryState::default();
        state.activity.record(ActivityEntry::new(APPLICATION_STARTED));

        let (ticks, _) = watch::channel(format_duration(Duration::ZERO));
        Self {
            state: Arc::new(Mutex::new(state)),
            ticks: Arc::new(ticks),
        }
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn current_session_stats(&self) -> SessionStats {
        let state = self.lock();
        SessionStats {
            login_time: state.login_time.clone(),
            duration: format_duration(state.elapsed()),
            call_count: state.call_count,
        }
    }

    pub fn current_performance_stats(&self) -> PerformanceSnapshot {
        self.lock().performance.clone()
    }

    /// Newest first.
    pub fn activity_log(&self) -> Vec<ActivityEntry> {
        self.lock().activity.to_vec()
    }

    /// `H:MM:SS`
    pub fn session_duration(&self) -> String {
        format_duration(self.elapsed())
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed()
    }

    pub fn call_count(&self) -> u64 {
        self.lock().call_count
    }

    pub fn is_running(&self) -> bool {
        self.lock().ticker.is_some()
    }

    /// Receives the formatted duration on every tick.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.ticks.subscribe()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Starts timing a session. A ticker left over from a previous start is
    /// cancelled first.
    ///
    /// The ticker needs a Tokio runtime; without one the duration is still
    /// correct when read, only the tick notifications are missing.
    pub fn start(&self) {
        let token = CancellationToken::new();
        let started_at = Instant::now();
        {
            let mut state = self.lock();
            if state.cancel_ticker() {
                tracing::debug!("Restarting session telemetry");
            }
            state.started_at = Some(started_at);
            state.stopped_elapsed = None;
            state.login_time = Local::now().format("%H:%M:%S").to_string();
            state.call_count = 0;
            state.ticker = Some(token.clone());
            state.activity.record(ActivityEntry::new(SESSION_STARTED));
        }
        self.ticks.send_replace(format_duration(Duration::ZERO));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run_ticker(
                    Arc::downgrade(&self.state),
                    self.ticks.clone(),
                    token,
                    started_at,
                ));
            }
            Err(_) => tracing::warn!("No Tokio runtime; session ticks disabled"),
        }
    }

    /// Stops the ticker and freezes the duration. Does nothing when not running.
    pub fn stop(&self) {
        let mut state = self.lock();
        if !state.cancel_ticker() {
            return;
        }
        let elapsed = state.elapsed();
        state.stopped_elapsed = Some(elapsed);
        state.activity.record(ActivityEntry::new(SESSION_ENDED));
    }

    pub fn increment_call_count(&self) {
        self.lock().call_count += 1;
    }

    pub fn record_activity(&self, text: impl Into<String>) {
        self.lock().activity.record(ActivityEntry::new(text));
    }

    pub fn update_performance_sample(&self, sample: PerformanceSample) {
        self.lock().performance.apply(sample);
    }

    /// Empties the feed, leaving only a "cleared" entry.
    pub fn clear_activity_log(&self) {
        let mut state = self.lock();
        state.activity.clear();
        state.activity.record(ActivityEntry::new(LOG_CLEARED));
    }

    /// Clears every field and stops the ticker.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.cancel_ticker();
        *state = TelemetryState::default();
        drop(state);
        self.ticks.send_replace(format_duration(Duration::ZERO));
    }

    fn lock(&self) -> MutexGuard<'_, TelemetryState> {
        lock(&self.state)
    }
}

impl Drop for SessionTelemetry {
    fn drop(&mut self) {
        self.lock().cancel_ticker();
    }
}

impl SessionObserver for SessionTelemetry {
    fn session_started(&self) {
        self.start();
    }

    fn session_ended(&self) {
        self.stop();
    }

    fn remote_call(&self) {
        self.increment_call_count();
    }
}

fn lock(state: &Mutex<TelemetryState>) -> MutexGuard<'_, TelemetryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_ticker(
    state: Weak<Mutex<TelemetryState>>,
    ticks: Arc<watch::Sender<String>>,
    token: CancellationToken,
    started_at: Instant,
) {
    let mut interval = tokio::time::interval_at(started_at + TICK_INTERVAL, TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let Some(state) = state.upgrade() else { break };
                let duration = {
                    let guard = lock(&state);
                    // stop() cancels under the same lock
                    if token.is_cancelled() {
                        break;
                    }
                    format_duration(guard.elapsed())
                };
                ticks.send_replace(duration);
            }
        }
    }
}
