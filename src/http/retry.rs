//! Retry policy and backoff computation

use super::outcome::OutcomeClass;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

/// Immutable retry configuration for a request executor.
///
/// Build one with [`RetryPolicy::builder`]; it cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
    backoff_multiplier: f64,
    jitter: Duration,
    max_backoff: Duration,
    retry_on: HashSet<OutcomeClass>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(50),
            backoff_multiplier: 2.0,
            jitter: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            retry_on: [OutcomeClass::RateLimited, OutcomeClass::Transient]
                .into_iter()
                .collect(),
        }
    }
}

impl RetryPolicy {
    /// Create a new policy builder starting from the defaults
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self::builder().max_attempts(1).build()
    }

    /// Maximum number of network attempts per call (at least one)
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the second attempt, before jitter
    pub fn base_backoff(&self) -> Duration {
        self.base_backoff
    }

    /// Growth factor between consecutive backoffs
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Largest random addition to a backoff
    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Cap applied after jitter
    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Whether an outcome of this class may be retried
    pub fn should_retry(&self, class: OutcomeClass) -> bool {
        self.retry_on.contains(&class)
    }

    /// Backoff before `attempt` without jitter: `base * multiplier^(attempt-2)`,
    /// capped at `max_backoff`. Zero for the first attempt.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let nanos = (self.base_backoff.as_nanos() as f64
            * self.backoff_multiplier.powi(exponent))
        .round();
        if !nanos.is_finite() || nanos >= self.max_backoff.as_nanos() as f64 {
            return self.max_backoff;
        }
        Duration::from_nanos(nanos as u64)
    }

    /// Backoff before `attempt`, with jitter drawn from the thread RNG
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_with(attempt, &mut rand::thread_rng())
    }

    /// Backoff before `attempt`, with jitter drawn from `rng`.
    ///
    /// Lies in `[base_delay, base_delay + jitter]`, capped at `max_backoff`.
    pub fn backoff_with<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let jitter_nanos = u64::try_from(self.jitter.as_nanos()).unwrap_or(u64::MAX);
        let jitter = Duration::from_nanos(rng.gen_range(0..=jitter_nanos));
        self.base_delay(attempt)
            .saturating_add(jitter)
            .min(self.max_backoff)
    }

    /// Backoff before `attempt` given the delay used before the previous one.
    ///
    /// Never shorter than `previous`, so the delays of one call do not
    /// decrease even when jitter is wider than the gap between base delays.
    pub fn next_backoff(&self, attempt: u32, previous: Duration) -> Duration {
        self.next_backoff_with(attempt, previous, &mut rand::thread_rng())
    }

    /// [`next_backoff`](Self::next_backoff) with jitter drawn from `rng`
    pub fn next_backoff_with<R: Rng + ?Sized>(
        &self,
        attempt: u32,
        previous: Duration,
        rng: &mut R,
    ) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        self.backoff_with(attempt, rng)
            .max(previous)
            .min(self.max_backoff)
    }
}

/// Builder for [`RetryPolicy`]
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Set max attempts (clamped to at least one)
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts.max(1);
        self
    }

    /// Set exponential backoff parameters
    #[must_use]
    pub fn backoff(mut self, base: Duration, multiplier: f64, max: Duration) -> Self {
        self.policy.base_backoff = base;
        self.policy.backoff_multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        self.policy.max_backoff = max;
        self
    }

    /// Set the jitter range
    #[must_use]
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.policy.jitter = jitter;
        self
    }

    /// Set the outcome classes that may be retried.
    ///
    /// `Success` and `Permanent` are ignored.
    #[must_use]
    pub fn retry_on(mut self, classes: impl IntoIterator<Item = OutcomeClass>) -> Self {
        self.policy.retry_on = classes
            .into_iter()
            .filter(|c| matches!(c, OutcomeClass::RateLimited | OutcomeClass::Transient))
            .collect();
        self
    }

    /// Build the policy
    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;
    use rand::SeedableRng;

    fn policy(base_ms: u64, multiplier: f64, jitter_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy::builder()
            .backoff(
                Duration::from_millis(base_ms),
                multiplier,
                Duration::from_millis(max_ms),
            )
            .jitter(Duration::from_millis(jitter_ms))
            .build()
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_backoff(), Duration::from_millis(50));
        assert_eq!(policy.max_backoff(), Duration::from_secs(10));
        assert!(policy.should_retry(OutcomeClass::RateLimited));
        assert!(policy.should_retry(OutcomeClass::Transient));
        assert!(!policy.should_retry(OutcomeClass::Permanent));
        assert!(!policy.should_retry(OutcomeClass::Success));
    }

    #[test]
    fn test_first_attempt_has_no_backoff() {
        let policy = policy(100, 2.0, 50, 10_000);
        assert_eq!(policy.base_delay(1), Duration::ZERO);
        assert_eq!(policy.backoff_for(1), Duration::ZERO);
        assert_eq!(policy.backoff_for(0), Duration::ZERO);
    }

    #[test]
    fn test_base_delay_is_exponential() {
        let policy = policy(100, 2.0, 0, 10_000);
        assert_eq!(policy.base_delay(2), Duration::from_millis(100));
        assert_eq!(policy.base_delay(3), Duration::from_millis(200));
        assert_eq!(policy.base_delay(4), Duration::from_millis(400));
        assert_eq!(policy.base_delay(5), Duration::from_millis(800));
    }

    #[test]
    fn test_base_delay_respects_max() {
        let policy = policy(100, 2.0, 0, 500);
        assert_eq!(policy.base_delay(10), Duration::from_millis(500));
        assert_eq!(policy.base_delay(u32::MAX), Duration::from_millis(500));
    }

    #[test]
    fn test_constant_multiplier() {
        let policy = policy(250, 1.0, 0, 10_000);
        assert_eq!(policy.base_delay(2), Duration::from_millis(250));
        assert_eq!(policy.base_delay(7), Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_within_jitter_bounds() {
        let policy = policy(100, 3.0, 40, 60_000);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for attempt in 2..8 {
            let low = Duration::from_millis(100) * 3u32.pow(attempt - 2);
            let high = low + Duration::from_millis(40);
            for _ in 0..50 {
                let delay = policy.backoff_with(attempt, &mut rng);
                assert!(delay >= low && delay <= high, "{delay:?} outside [{low:?}, {high:?}]");
            }
        }
    }

    #[test]
    fn test_next_backoff_never_decreases() {
        let policy = RetryPolicy::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let mut previous = Duration::ZERO;
            for attempt in 2..=6 {
                let delay = policy.next_backoff_with(attempt, previous, &mut rng);
                assert!(delay >= previous, "{delay:?} < {previous:?} at attempt {attempt}");
                assert!(delay >= policy.base_delay(attempt));
                assert!(delay <= policy.max_backoff());
                previous = delay;
            }
        }
    }

    #[test]
    fn test_next_backoff_respects_cap() {
        let policy = policy(100, 2.0, 0, 150);
        let delay = policy.next_backoff(3, Duration::from_secs(5));
        assert_eq!(delay, Duration::from_millis(150));
        assert_eq!(policy.next_backoff(1, Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_jitter_capped_at_max_backoff() {
        let policy = policy(100, 2.0, 1_000, 150);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let delay = policy.backoff_with(2, &mut rng);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[test]
    fn test_builder_clamps_values() {
        let policy = RetryPolicy::builder()
            .max_attempts(0)
            .backoff(Duration::from_millis(10), f64::NAN, Duration::from_secs(1))
            .build();
        assert_eq!(policy.max_attempts(), 1);
        assert!((policy.backoff_multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_retry_on_filters_terminal_classes() {
        let policy = RetryPolicy::builder()
            .retry_on([OutcomeClass::Permanent, OutcomeClass::Transient])
            .build();
        assert!(policy.should_retry(OutcomeClass::Transient));
        assert!(!policy.should_retry(OutcomeClass::Permanent));
        assert!(!policy.should_retry(OutcomeClass::RateLimited));
    }

    #[test]
    fn test_no_retry() {
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
    }
}
