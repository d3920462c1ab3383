//! Attempt observation hook
//!
//! Every network attempt made by a [`RequestExecutor`](super::RequestExecutor)
//! is reported to its observers. Observers are optional; logging and metrics
//! integrations subscribe here.

use super::outcome::OutcomeClass;
use std::time::Duration;
use tracing::{debug, warn};

/// One network attempt, as seen by observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    /// Request target (path or URL)
    pub target: String,
    /// 1-based attempt number
    pub attempt: u32,
    /// Attempt budget for the call
    pub max_attempts: u32,
    /// Classification of this attempt
    pub outcome: OutcomeClass,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Time spent waiting on the rate limiter before this attempt
    pub gate_wait: Duration,
    /// Backoff scheduled before the next attempt, zero when none follows
    pub backoff: Duration,
    /// Duration of the transport call
    pub elapsed: Duration,
}

/// Subscriber for attempt events
pub trait AttemptObserver: Send + Sync {
    /// Called once per attempt, after classification
    fn on_attempt(&self, event: &AttemptEvent);
}

impl<F> AttemptObserver for F
where
    F: Fn(&AttemptEvent) + Send + Sync,
{
    fn on_attempt(&self, event: &AttemptEvent) {
        self(event);
    }
}

/// Observer that logs each attempt through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, event: &AttemptEvent) {
        match event.outcome {
            OutcomeClass::Success => debug!(
                request = %event.target,
                attempt = event.attempt,
                status = ?event.status,
                elapsed_ms = event.elapsed.as_millis() as u64,
                "request succeeded"
            ),
            outcome => warn!(
                request = %event.target,
                attempt = event.attempt,
                max_attempts = event.max_attempts,
                %outcome,
                status = ?event.status,
                backoff_ms = event.backoff.as_millis() as u64,
                "request attempt failed"
            ),
        }
    }
}

#[cfg(test)]
mod observe_tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn event(outcome: OutcomeClass) -> AttemptEvent {
        AttemptEvent {
            target: "/player/hikaru".to_string(),
            attempt: 1,
            max_attempts: 3,
            outcome,
            status: Some(503),
            gate_wait: Duration::ZERO,
            backoff: Duration::from_millis(50),
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_closure_observer() {
        let seen = AtomicU32::new(0);
        let observer = |e: &AttemptEvent| {
            seen.fetch_add(e.attempt, Ordering::SeqCst);
        };
        observer.on_attempt(&event(OutcomeClass::Transient));
        observer.on_attempt(&event(OutcomeClass::Success));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tracing_observer_handles_all_outcomes() {
        for outcome in [
            OutcomeClass::Success,
            OutcomeClass::RateLimited,
            OutcomeClass::Transient,
            OutcomeClass::Permanent,
        ] {
            TracingObserver.on_attempt(&event(outcome));
        }
    }
}
