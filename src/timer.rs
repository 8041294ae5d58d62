use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use instant::Instant;

/// Per-move thinking time used when no game clock exists.
pub const DEFAULT_MAX_CAP: Duration = Duration::from_secs(20);

/// Interval between deadline checks of the watcher thread.
const WATCHER_TICK: Duration = Duration::from_millis(200);

/// Shared flag read cooperatively by search loops.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Stopwatch accumulating time across start/stop cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chronometer {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Chronometer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts the chronometer. No-op when already running.
    #[inline]
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    #[inline]
    pub fn stop(&mut self) {
        self.accumulated = self.partial();
        self.started_at = None;
    }

    #[inline]
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }

    /// Total running time so far, including the current run.
    #[inline]
    pub fn partial(&self) -> Duration {
        match self.started_at {
            Some(t) => self.accumulated + t.elapsed(),
            None => self.accumulated,
        }
    }
}

/// What a clock-aware strategy sees at the start of its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockSnapshot {
    /// Match turn number, starting at 1.
    pub turn: u32,
    pub time_left: Duration,
}

/// Per-player match clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClock {
    pub chrono: Chronometer,
    pub limit: Option<Duration>,
}

impl GameClock {
    #[inline]
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            chrono: Chronometer::new(),
            limit,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.chrono.partial()
    }

    #[inline]
    pub fn time_left(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.elapsed()))
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.time_left() == Some(Duration::ZERO)
    }

    /// `None` for untimed clocks.
    #[inline]
    pub fn snapshot(&self, turn: u32) -> Option<ClockSnapshot> {
        self.time_left().map(|time_left| ClockSnapshot { turn, time_left })
    }
}

/// Wall-clock budget for a single move.
///
/// The deadline is checked by polling `timed_out`. `start_with_watcher` additionally spawns a
/// thread that fires a callback once the limit elapses; the thread exits after firing or when
/// the timer is dropped.
#[derive(Debug)]
pub struct TurnTimer {
    started_at: Instant,
    limit: Duration,
    timed_out: CancellationToken,
    stopped: CancellationToken,
}

impl TurnTimer {
    pub fn start(limit: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            limit,
            timed_out: CancellationToken::new(),
            stopped: CancellationToken::new(),
        }
    }

    pub fn start_with_watcher<F>(limit: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let timer = Self::start(limit);
        let started_at = timer.started_at;
        let timed_out = timer.timed_out.clone();
        let stopped = timer.stopped.clone();
        thread::spawn(move || loop {
            if stopped.is_cancelled() {
                break;
            }
            let elapsed = started_at.elapsed();
            if elapsed < limit {
                thread::sleep(WATCHER_TICK.min(limit - elapsed));
                continue;
            }
            callback();
            timed_out.cancel();
            break;
        });
        timer
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// Whether the limit has elapsed, either observed by polling or flagged by the watcher.
    #[inline]
    pub fn timed_out(&self) -> bool {
        if self.timed_out.is_cancelled() {
            return true;
        }
        if self.elapsed() >= self.limit {
            self.timed_out.cancel();
            return true;
        }
        false
    }

    /// Handle to the timeout flag, for sharing with other loops.
    #[inline]
    pub fn token(&self) -> CancellationToken {
        self.timed_out.clone()
    }

    #[inline]
    pub fn stop(&self) {
        self.stopped.cancel()
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        self.stop()
    }
}

/// How a clock-aware strategy splits the remaining game time into a per-move limit.
#[derive(Debug, Clone, Copy)]
pub enum BudgetRule {
    /// Always think for the cap.
    Fixed,
    /// `time_left / (expected_turns - turn)`, the divisor never going below 1.
    SpreadOverTurns { expected_turns: u32 },
    Custom(fn(ClockSnapshot) -> Duration),
}

impl BudgetRule {
    pub fn apply(&self, clock: ClockSnapshot) -> Option<Duration> {
        match self {
            BudgetRule::Fixed => None,
            BudgetRule::SpreadOverTurns { expected_turns } => {
                let divisor = expected_turns.saturating_sub(clock.turn).max(1);
                Some(clock.time_left / divisor)
            }
            BudgetRule::Custom(f) => Some(f(clock)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    pub max_cap: Duration,
    pub rule: BudgetRule,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self {
            max_cap: DEFAULT_MAX_CAP,
            rule: BudgetRule::Fixed,
        }
    }
}

impl TimeBudget {
    #[inline]
    pub fn spread_over_turns(expected_turns: u32) -> Self {
        Self {
            rule: BudgetRule::SpreadOverTurns { expected_turns },
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_max_cap(self, max_cap: Duration) -> Self {
        Self { max_cap, ..self }
    }

    /// `min(max_cap, rule(clock))` for timed games, `max_cap` otherwise.
    pub fn per_move(&self, clock: Option<ClockSnapshot>) -> Duration {
        match clock.and_then(|c| self.rule.apply(c)) {
            Some(d) => d.min(self.max_cap),
            None => self.max_cap,
        }
    }
}

/// Splits a duration into whole hours, minutes and seconds.
pub fn to_hms(d: Duration) -> (u64, u64, u64) {
    let secs = d.as_secs();
    let (m, s) = (secs / 60, secs % 60);
    (m / 60, m % 60, s)
}
