//! Client-side rate limiting for outbound API calls.
//!
//! Two independent caps are enforced: a rolling 60 second window and a
//! per-day bucket keyed by UTC date. Bookkeeping is kept bounded by three
//! eviction passes with different triggers: the minute window is trimmed on
//! every check, a periodic sweep runs once `cleanup_interval` has elapsed,
//! and an emergency pass truncates either collection once it grows past
//! `max_array_size`.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use parking_lot::Mutex as SyncMutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::{OverflowMode, RateLimitConfig};
use crate::error::MondayError;

const WINDOW_SECS: i64 = 60;
const DAILY_RETENTION_DAYS: i64 = 7;
const EMERGENCY_DAY_KEYS: usize = 30;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A settable clock. `sleep` advances the clock instead of blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<SyncMutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(SyncMutex::new(start)),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.now.lock() = time;
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock();
        *now = *now + to_chrono(duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

fn to_chrono(duration: Duration) -> ChronoDuration {
    ChronoDuration::milliseconds(duration.as_millis() as i64)
}

/// Outcome of the check half of a limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    /// Minute window is full; the caller must wait this long before recording.
    Wait(Duration),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UsageStats {
    pub minute_requests: u32,
    pub minute_limit: u32,
    pub minute_remaining: u32,
    pub daily_requests: u32,
    pub daily_limit: u32,
    pub daily_remaining: u32,
    pub cleanup_stats: CleanupStats,
    pub memory_stats: MemoryStats,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CleanupStats {
    pub total_cleanups: u64,
    pub avg_cleanup_time_ms: u64,
    pub last_cleanup: String,
    pub next_cleanup_in: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemoryStats {
    pub request_times_size: usize,
    pub daily_requests_size: usize,
    pub max_array_size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CleanupConfig {
    pub cleanup_interval: u64,
    pub max_array_size: usize,
    /// Unix seconds, `0` if no cleanup has run since construction or reset.
    pub last_cleanup_time: i64,
    pub total_cleanups: u64,
}

pub struct RateLimiter<C: Clock = SystemClock> {
    config: RateLimitConfig,
    clock: C,
    request_times: VecDeque<DateTime<Utc>>,
    daily_requests: BTreeMap<NaiveDate, u32>,
    last_cleanup_time: Option<DateTime<Utc>>,
    cleanup_count: u64,
    total_cleanup_time_ms: u64,
}

impl RateLimiter<SystemClock> {
    pub fn new(config: RateLimitConfig) -> Result<Self, MondayError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Result<Self, MondayError> {
        config.validate()?;
        let now = clock.now();
        Ok(Self {
            request_times: VecDeque::new(),
            daily_requests: BTreeMap::new(),
            last_cleanup_time: Some(now),
            cleanup_count: 0,
            total_cleanup_time_ms: 0,
            config,
            clock,
        })
    }

    /// Gate one outbound request, recording it if admitted.
    ///
    /// In [`OverflowMode::Block`] a full minute window suspends the calling
    /// thread through the clock and then records; in [`OverflowMode::Reject`]
    /// it fails with [`MondayError::RateLimit`]. A full daily bucket always
    /// fails, carrying `retry_delay` as the retry-after.
    pub fn check_limit(&mut self) -> Result<(), MondayError> {
        if let Admission::Wait(wait) = self.admit()? {
            self.clock.sleep(wait);
        }
        self.record();
        Ok(())
    }

    /// Run cleanup and both cap checks without recording the request.
    pub fn admit(&mut self) -> Result<Admission, MondayError> {
        let now = self.clock.now();
        let today = now.date_naive();

        if self.cleanup_due(now) {
            self.run_cleanup(now);
        }

        self.evict_expired(now);

        let daily = self.daily_requests.get(&today).copied().unwrap_or(0);
        if daily >= self.config.daily_limit {
            warn!(
                daily_requests = daily,
                daily_limit = self.config.daily_limit,
                retry_after = self.config.retry_delay,
                "Daily rate limit reached"
            );
            return Err(MondayError::RateLimit {
                retry_after: self.config.retry_delay,
            });
        }

        if self.request_times.len() >= self.config.minute_limit as usize {
            let oldest = self.request_times.front().copied().unwrap_or(now);
            let elapsed = (now - oldest).num_seconds();
            let wait = (WINDOW_SECS - elapsed).max(1) as u64;

            warn!(
                minute_requests = self.request_times.len(),
                minute_limit = self.config.minute_limit,
                wait_secs = wait,
                mode = ?self.config.mode,
                "Minute rate limit reached"
            );

            return match self.config.mode {
                OverflowMode::Reject => Err(MondayError::RateLimit { retry_after: wait }),
                OverflowMode::Block => Ok(Admission::Wait(Duration::from_secs(wait))),
            };
        }

        Ok(Admission::Granted)
    }

    /// Record one request at the current time.
    pub fn record(&mut self) {
        let now = self.clock.now();
        // Kept sorted even if the wall clock steps backwards, so front-only
        // eviction and oldest-first truncation stay correct.
        let pos = self.request_times.partition_point(|t| *t <= now);
        self.request_times.insert(pos, now);
        let count = self.daily_requests.entry(now.date_naive()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Run the periodic cleanup body regardless of the interval.
    pub fn force_cleanup(&mut self) {
        let now = self.clock.now();
        self.run_cleanup(now);
    }

    pub fn usage_stats(&self) -> UsageStats {
        let now = self.clock.now();
        let cutoff = now - ChronoDuration::seconds(WINDOW_SECS);

        let minute_requests = self.request_times.iter().filter(|t| **t >= cutoff).count() as u32;
        let daily_requests = self
            .daily_requests
            .get(&now.date_naive())
            .copied()
            .unwrap_or(0);

        let avg_cleanup_time_ms = if self.cleanup_count > 0 {
            self.total_cleanup_time_ms / self.cleanup_count
        } else {
            0
        };

        let (last_cleanup, next_cleanup_in) = match self.last_cleanup_time {
            Some(last) => {
                let since = (now - last).num_seconds();
                let next = (self.config.cleanup_interval as i64 - since).max(0) as u64;
                (last.format("%Y-%m-%d %H:%M:%S UTC").to_string(), next)
            }
            None => ("never".to_string(), 0),
        };

        UsageStats {
            minute_requests,
            minute_limit: self.config.minute_limit,
            minute_remaining: self.config.minute_limit.saturating_sub(minute_requests),
            daily_requests,
            daily_limit: self.config.daily_limit,
            daily_remaining: self.config.daily_limit.saturating_sub(daily_requests),
            cleanup_stats: CleanupStats {
                total_cleanups: self.cleanup_count,
                avg_cleanup_time_ms,
                last_cleanup,
                next_cleanup_in,
            },
            memory_stats: MemoryStats {
                request_times_size: self.request_times.len(),
                daily_requests_size: self.daily_requests.len(),
                max_array_size: self.config.max_array_size,
            },
        }
    }

    pub fn cleanup_config(&self) -> CleanupConfig {
        CleanupConfig {
            cleanup_interval: self.config.cleanup_interval,
            max_array_size: self.config.max_array_size,
            last_cleanup_time: self.last_cleanup_time.map_or(0, |t| t.timestamp()),
            total_cleanups: self.cleanup_count,
        }
    }

    pub fn reset(&mut self) {
        self.request_times.clear();
        self.daily_requests.clear();
        self.last_cleanup_time = None;
        self.cleanup_count = 0;
        self.total_cleanup_time_ms = 0;
    }

    fn cleanup_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_cleanup_time {
            Some(last) => (now - last).num_seconds() >= self.config.cleanup_interval as i64,
            None => true,
        }
    }

    fn evict_expired(&mut self, now: DateTime<Utc>) {
        let cutoff = now - ChronoDuration::seconds(WINDOW_SECS);
        while self.request_times.front().map_or(false, |&t| t < cutoff) {
            self.request_times.pop_front();
        }
    }

    fn run_cleanup(&mut self, now: DateTime<Utc>) {
        let started = Instant::now();
        let before_times = self.request_times.len();
        let before_days = self.daily_requests.len();

        self.evict_expired(now);

        let cutoff = now.date_naive() - ChronoDuration::days(DAILY_RETENTION_DAYS);
        self.daily_requests = self.daily_requests.split_off(&cutoff);

        self.emergency_cleanup();

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.total_cleanup_time_ms = self.total_cleanup_time_ms.saturating_add(elapsed_ms);
        self.cleanup_count += 1;
        self.last_cleanup_time = Some(now);

        debug!(
            removed_request_times = before_times - self.request_times.len(),
            removed_days = before_days - self.daily_requests.len(),
            elapsed_ms,
            total_cleanups = self.cleanup_count,
            "Rate limiter cleanup finished"
        );
    }

    fn emergency_cleanup(&mut self) {
        let max = self.config.max_array_size;

        if self.request_times.len() > max {
            let keep = self.config.minute_limit as usize;
            let excess = self.request_times.len().saturating_sub(keep);
            self.request_times.drain(..excess);
            debug!(
                removed = excess,
                max_array_size = max,
                "Emergency eviction of request timestamps"
            );
        }

        if self.daily_requests.len() > max {
            let mut removed = 0usize;
            while self.daily_requests.len() > EMERGENCY_DAY_KEYS {
                self.daily_requests.pop_first();
                removed += 1;
            }
            debug!(
                removed,
                max_array_size = max,
                "Emergency eviction of daily buckets"
            );
        }
    }
}

/// A rate limiter shared between concurrent callers.
///
/// The lock is held from the check through the optional wait to the record,
/// so no two callers can both observe free capacity and both be admitted.
///
/// In [`OverflowMode::Block`] that wait can last up to 60 seconds, and every
/// other method on this type (including [`usage_stats`](Self::usage_stats))
/// queues behind it until the waiting caller has recorded its request.
pub struct SharedRateLimiter<C: Clock = SystemClock> {
    inner: Arc<Mutex<RateLimiter<C>>>,
}

impl<C: Clock> Clone for SharedRateLimiter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Clock> SharedRateLimiter<C> {
    pub fn new(limiter: RateLimiter<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(limiter)),
        }
    }

    pub async fn acquire(&self) -> Result<(), MondayError> {
        let mut limiter = self.inner.lock().await;
        if let Admission::Wait(wait) = limiter.admit()? {
            debug!(wait_secs = wait.as_secs(), "Waiting for minute window");
            tokio::time::sleep(wait).await;
        }
        limiter.record();
        Ok(())
    }

    pub async fn usage_stats(&self) -> UsageStats {
        self.inner.lock().await.usage_stats()
    }

    pub async fn cleanup_config(&self) -> CleanupConfig {
        self.inner.lock().await.cleanup_config()
    }

    pub async fn force_cleanup(&self) {
        self.inner.lock().await.force_cleanup();
    }

    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }
}
