//! Rate limiting implementation
//!
//! Sliding-window limiter: at most `quota` grants within any interval of
//! length `window`. The limiter never sleeps on its own; `acquire` answers
//! either [`Acquire::Granted`] or [`Acquire::Wait`] and the caller decides how
//! to suspend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Maximum number of requests within one window
    pub quota: u32,
    /// Length of the sliding window
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_minute(300)
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(quota: u32, window: Duration) -> Self {
        Self { quota, window }
    }

    /// `quota` requests per second
    pub fn per_second(quota: u32) -> Self {
        Self::new(quota, Duration::from_secs(1))
    }

    /// `quota` requests per minute
    pub fn per_minute(quota: u32) -> Self {
        Self::new(quota, Duration::from_secs(60))
    }
}

/// Result of a single acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// A slot was recorded; the request may proceed now
    Granted,
    /// No slot is available; try again after this long
    Wait(Duration),
}

impl Acquire {
    /// Whether the acquisition was granted
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquire::Granted)
    }
}

/// Grant timestamps within the sliding window.
///
/// Invariant: the number of timestamps younger than `window` never exceeds
/// `quota`. Expired entries are evicted lazily on each check.
#[derive(Debug)]
pub struct RateWindow {
    quota: usize,
    window: Duration,
    grants: VecDeque<Instant>,
}

impl RateWindow {
    /// Create an empty window. A zero quota is treated as one.
    pub fn new(quota: u32, window: Duration) -> Self {
        let quota = quota.max(1) as usize;
        Self {
            quota,
            window,
            grants: VecDeque::with_capacity(quota),
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&oldest) = self.grants.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.grants.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until a slot frees up, zero if one is free now
    fn wait_time(&mut self, now: Instant) -> Duration {
        self.evict(now);
        if self.grants.len() < self.quota {
            return Duration::ZERO;
        }
        match self.grants.front() {
            Some(&oldest) => (oldest + self.window).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Record a grant at `now` if the quota allows it
    pub fn try_record(&mut self, now: Instant) -> Acquire {
        let wait = self.wait_time(now);
        if wait.is_zero() {
            self.grants.push_back(now);
            Acquire::Granted
        } else {
            Acquire::Wait(wait)
        }
    }

    /// Number of grants currently inside the window
    pub fn in_window(&mut self, now: Instant) -> usize {
        self.evict(now);
        self.grants.len()
    }
}

/// Sliding-window rate limiter shared by every executor using the same quota.
///
/// Cloning yields another handle to the same window.
#[derive(Clone)]
pub struct RateLimiter {
    window: Arc<Mutex<RateWindow>>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            window: Arc::new(Mutex::new(RateWindow::new(config.quota, config.window))),
            config: *config,
        }
    }

    /// Create a rate limiter with default settings
    pub fn default_limiter() -> Self {
        Self::new(&RateLimiterConfig::default())
    }

    /// The limiter's configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Try to take a slot now
    pub fn acquire(&self) -> Acquire {
        self.acquire_at(Instant::now(), None)
    }

    /// Try to take a slot, honoring a server-provided earliest start time.
    ///
    /// When `not_before` lies in the future the answer is a wait of
    /// `max(window wait, not_before - now)` and nothing is recorded.
    pub fn acquire_after(&self, not_before: Option<Instant>) -> Acquire {
        self.acquire_at(Instant::now(), not_before)
    }

    /// Deterministic form of [`acquire_after`](Self::acquire_after)
    pub fn acquire_at(&self, now: Instant, not_before: Option<Instant>) -> Acquire {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(not_before) = not_before {
            if not_before > now {
                let hint = not_before - now;
                let computed = window.wait_time(now);
                return Acquire::Wait(hint.max(computed));
            }
        }

        let result = window.try_record(now);
        trace!(?result, in_window = window.grants.len(), "rate limiter acquire");
        result
    }

    /// Check if a request can be made immediately, taking the slot if so
    pub fn try_acquire(&self) -> bool {
        self.acquire().is_granted()
    }

    /// Suspend until a slot is granted. Returns the total time waited.
    pub async fn until_ready(&self) -> Duration {
        self.until_ready_after(None).await
    }

    /// Suspend until a slot is granted and `not_before` has passed.
    ///
    /// The lock is never held across the sleep, so dropping this future
    /// leaves the limiter untouched.
    pub async fn until_ready_after(&self, not_before: Option<Instant>) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            match self.acquire_after(not_before) {
                Acquire::Granted => return waited,
                Acquire::Wait(delay) => {
                    tokio::time::sleep(delay).await;
                    waited += delay;
                }
            }
        }
    }

    /// Wait with a timeout
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.until_ready())
            .await
            .is_ok()
    }

    /// Number of grants inside the current window
    pub fn in_window(&self) -> usize {
        self.window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_window(Instant::now())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::default_limiter()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("quota", &self.config.quota)
            .field("window", &self.config.window)
            .finish_non_exhaustive()
    }
}
