//! Request executor
//!
//! Runs one logical API call as a bounded loop of attempts:
//! - each attempt first passes the rate limiter gate (waiting there does not
//!   consume an attempt)
//! - the transport call is bounded by the per-request timeout
//! - the result is classified once and the retry policy decides what follows

use super::observe::{AttemptEvent, AttemptObserver};
use super::outcome::{OutcomeClass, RequestOutcome};
use super::rate_limit::RateLimiter;
use super::retry::RetryPolicy;
use super::transport::{ApiRequest, RawResponse, Transport, TransportError};
use crate::error::{ApiError, ErrorKind, FailureCause};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// In-flight state of one logical call
#[derive(Debug)]
struct PendingRequest<'a> {
    request: &'a ApiRequest,
    attempt: u32,
    accumulated_delay: Duration,
    last_backoff: Duration,
    /// Earliest start of the next attempt, from a server retry hint
    not_before: Option<Instant>,
}

impl<'a> PendingRequest<'a> {
    fn new(request: &'a ApiRequest) -> Self {
        Self {
            request,
            attempt: 0,
            accumulated_delay: Duration::ZERO,
            last_backoff: Duration::ZERO,
            not_before: None,
        }
    }
}

/// Executes API calls through a transport with rate limiting and retries
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    rate_limiter: Option<RateLimiter>,
    timeout: Duration,
    observers: Vec<Arc<dyn AttemptObserver>>,
}

impl RequestExecutor {
    /// Create an executor with the default retry policy and no rate limiter
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            rate_limiter: None,
            timeout: DEFAULT_TIMEOUT,
            observers: Vec::new(),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Gate every attempt through `limiter`.
    ///
    /// Pass clones of one limiter to every executor sharing a quota.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Set the default per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register an attempt observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The default retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The shared rate limiter, if any
    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.rate_limiter.as_ref()
    }

    /// The default per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute a request with the executor's retry policy
    pub async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.execute_with(request, &self.policy).await
    }

    /// Execute a request with an explicit retry policy
    pub async fn execute_with(
        &self,
        request: &ApiRequest,
        policy: &RetryPolicy,
    ) -> Result<RawResponse, ApiError> {
        let max_attempts = policy.max_attempts();
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut pending = PendingRequest::new(request);

        loop {
            let gate_wait = self.gate(pending.not_before).await;
            pending.attempt += 1;

            let started = Instant::now();
            let result =
                match tokio::time::timeout(timeout, self.transport.send(request, timeout)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(timeout)),
                };
            let elapsed = started.elapsed();

            let outcome = RequestOutcome::classify(result);
            let class = outcome.class();
            let status = outcome.status();
            let attempt = Attempt {
                class,
                status,
                gate_wait,
                elapsed,
            };

            let (kind, cause) = match outcome {
                RequestOutcome::Success(response) => {
                    self.notify(&pending, max_attempts, &attempt, Duration::ZERO);
                    debug!(
                        "Request succeeded: {} {} (attempt {}/{})",
                        request.method, request.target, pending.attempt, max_attempts
                    );
                    return Ok(response);
                }
                RequestOutcome::RateLimited { retry_after } => {
                    pending.not_before = retry_after.map(|d| Instant::now() + d);
                    (ErrorKind::RateLimited, FailureCause::RateLimited { retry_after })
                }
                RequestOutcome::TransientFailure(cause) => (ErrorKind::Transient, cause),
                RequestOutcome::PermanentFailure(cause) => (ErrorKind::Permanent, cause),
            };

            let retryable = policy.should_retry(class);
            if !retryable || pending.attempt >= max_attempts {
                self.notify(&pending, max_attempts, &attempt, Duration::ZERO);
                let kind = if retryable { ErrorKind::Exhausted } else { kind };
                warn!(
                    "Request {} {} failed ({}) after {} attempt(s), {:?} spent in backoff: {}",
                    request.method,
                    request.target,
                    kind,
                    pending.attempt,
                    pending.accumulated_delay,
                    cause
                );
                return Err(ApiError::new(kind, pending.attempt, cause));
            }

            let backoff = policy.next_backoff(pending.attempt + 1, pending.last_backoff);
            self.notify(&pending, max_attempts, &attempt, backoff);
            warn!(
                "Request {} {}: {}, attempt {}/{}, retrying in {:?}",
                request.method, request.target, cause, pending.attempt, max_attempts, backoff
            );
            tokio::time::sleep(backoff).await;
            pending.accumulated_delay += backoff;
            pending.last_backoff = backoff;
        }
    }

    /// Execute a request and decode the JSON response
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> crate::error::Result<T> {
        let response = self.execute(request).await?;
        response.json()
    }

    /// Wait for the rate limiter and any server hint. Returns the time waited.
    async fn gate(&self, not_before: Option<Instant>) -> Duration {
        if let Some(ref limiter) = self.rate_limiter {
            return limiter.until_ready_after(not_before).await;
        }

        let now = Instant::now();
        match not_before {
            Some(at) if at > now => {
                tokio::time::sleep_until(at).await;
                at - now
            }
            _ => Duration::ZERO,
        }
    }

    fn notify(
        &self,
        pending: &PendingRequest<'_>,
        max_attempts: u32,
        attempt: &Attempt,
        backoff: Duration,
    ) {
        if self.observers.is_empty() {
            return;
        }
        let event = AttemptEvent {
            target: pending.request.target.clone(),
            attempt: pending.attempt,
            max_attempts,
            outcome: attempt.class,
            status: attempt.status,
            gate_wait: attempt.gate_wait,
            backoff,
            elapsed: attempt.elapsed,
        };
        for observer in &self.observers {
            observer.on_attempt(&event);
        }
    }
}

/// Per-attempt facts reported to observers
struct Attempt {
    class: OutcomeClass,
    status: Option<u16>,
    gate_wait: Duration,
    elapsed: Duration,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("policy", &self.policy)
            .field("rate_limiter", &self.rate_limiter)
            .field("timeout", &self.timeout)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
