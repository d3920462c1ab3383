//! HTTP module
//!
//! Rate limiting and retry layer for the REST API.
//!
//! # Features
//!
//! - **Sliding-window rate limiting**: at most N requests per window, shared
//!   by every executor holding the same limiter
//! - **Outcome classification**: success, rate limited, transient, permanent
//! - **Retries**: bounded attempts with exponential backoff and jitter,
//!   honoring server `Retry-After` hints
//! - **Observation**: optional per-attempt hook for logging and metrics

mod executor;
mod observe;
mod outcome;
mod rate_limit;
mod retry;
mod transport;

pub use executor::RequestExecutor;
pub use observe::{AttemptEvent, AttemptObserver, TracingObserver};
pub use outcome::{parse_retry_after, OutcomeClass, RequestOutcome};
pub use rate_limit::{Acquire, RateLimiter, RateLimiterConfig, RateWindow};
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport, TransportError};
