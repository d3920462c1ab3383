//! Per-attempt outcome classification
//!
//! Each network attempt is classified exactly once into a [`RequestOutcome`];
//! the retry loop decides what to do from the tag alone.

use super::transport::{RawResponse, TransportError};
use crate::error::FailureCause;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound applied to server-provided retry hints
const MAX_RETRY_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome class, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    RateLimited,
    Transient,
    Permanent,
}

impl std::fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeClass::Success => "success",
            OutcomeClass::RateLimited => "rate_limited",
            OutcomeClass::Transient => "transient",
            OutcomeClass::Permanent => "permanent",
        };
        f.write_str(s)
    }
}

/// Tagged result of one network attempt
#[derive(Debug)]
pub enum RequestOutcome {
    /// 2xx response
    Success(RawResponse),
    /// 429 response, with the server's retry hint when one was sent
    RateLimited { retry_after: Option<Duration> },
    /// 5xx, timeout or connection failure
    TransientFailure(FailureCause),
    /// Any other failure; retrying will not help
    PermanentFailure(FailureCause),
}

impl RequestOutcome {
    /// Classify the raw result of a transport call
    pub fn classify(result: Result<RawResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(TransportError::Timeout(timeout)) => {
                Self::TransientFailure(FailureCause::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Err(TransportError::Connect(message)) => {
                Self::TransientFailure(FailureCause::Connect(message))
            }
            Err(e @ TransportError::Body(_)) => {
                Self::TransientFailure(FailureCause::Transport(e.to_string()))
            }
            Err(e @ TransportError::Request(_)) => {
                Self::PermanentFailure(FailureCause::Transport(e.to_string()))
            }
        }
    }

    fn from_response(response: RawResponse) -> Self {
        let status = response.status();
        match status {
            200..=299 => Self::Success(response),
            429 => Self::RateLimited {
                retry_after: response
                    .header("retry-after")
                    .and_then(|v| parse_retry_after(v, Utc::now())),
            },
            500..=599 => Self::TransientFailure(FailureCause::Status {
                status,
                body: response.text_lossy(),
            }),
            _ => Self::PermanentFailure(FailureCause::Status {
                status,
                body: response.text_lossy(),
            }),
        }
    }

    /// The outcome's class
    pub fn class(&self) -> OutcomeClass {
        match self {
            Self::Success(_) => OutcomeClass::Success,
            Self::RateLimited { .. } => OutcomeClass::RateLimited,
            Self::TransientFailure(_) => OutcomeClass::Transient,
            Self::PermanentFailure(_) => OutcomeClass::Permanent,
        }
    }

    /// HTTP status observed by the attempt, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success(response) => Some(response.status()),
            Self::RateLimited { .. } => Some(429),
            Self::TransientFailure(cause) | Self::PermanentFailure(cause) => cause.status(),
        }
    }
}

/// Parse a `Retry-After` header value.
///
/// Accepts delta-seconds or an HTTP date. Dates in the past yield zero.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.with_timezone(&Utc).signed_duration_since(now);
    Some(delta.to_std().unwrap_or(Duration::ZERO).min(MAX_RETRY_AFTER))
}

#[cfg(test)]
mod outcome_tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case(200, OutcomeClass::Success ; "ok")]
    #[test_case(204, OutcomeClass::Success ; "no content")]
    #[test_case(429, OutcomeClass::RateLimited ; "too many requests")]
    #[test_case(500, OutcomeClass::Transient ; "internal error")]
    #[test_case(502, OutcomeClass::Transient ; "bad gateway")]
    #[test_case(503, OutcomeClass::Transient ; "unavailable")]
    #[test_case(301, OutcomeClass::Permanent ; "moved")]
    #[test_case(304, OutcomeClass::Permanent ; "not modified")]
    #[test_case(400, OutcomeClass::Permanent ; "bad request")]
    #[test_case(401, OutcomeClass::Permanent ; "unauthorized")]
    #[test_case(404, OutcomeClass::Permanent ; "not found")]
    #[test_case(410, OutcomeClass::Permanent ; "gone")]
    fn test_classify_status(status: u16, expected: OutcomeClass) {
        let outcome = RequestOutcome::classify(Ok(RawResponse::new(status, "")));
        assert_eq!(outcome.class(), expected);
        assert_eq!(outcome.status(), Some(status));
    }

    #[test]
    fn test_classify_transport_errors() {
        let timeout =
            RequestOutcome::classify(Err(TransportError::Timeout(Duration::from_millis(250))));
        assert!(matches!(
            timeout,
            RequestOutcome::TransientFailure(FailureCause::Timeout { timeout_ms: 250 })
        ));

        let reset = RequestOutcome::classify(Err(TransportError::Connect("reset".into())));
        assert_eq!(reset.class(), OutcomeClass::Transient);

        let body = RequestOutcome::classify(Err(TransportError::Body("eof".into())));
        assert_eq!(body.class(), OutcomeClass::Transient);

        let bad = RequestOutcome::classify(Err(TransportError::Request("bad url".into())));
        assert_eq!(bad.class(), OutcomeClass::Permanent);
        assert_eq!(bad.status(), None);
    }

    #[test]
    fn test_classify_keeps_error_body() {
        let outcome = RequestOutcome::classify(Ok(RawResponse::new(404, "Not found")));
        let RequestOutcome::PermanentFailure(cause) = outcome else {
            panic!("expected permanent failure");
        };
        assert_eq!(
            cause,
            FailureCause::Status {
                status: 404,
                body: "Not found".to_string()
            }
        );
    }

    #[test]
    fn test_rate_limited_reads_retry_after() {
        let response = RawResponse::new(429, "").with_header("retry-after", "5");
        let outcome = RequestOutcome::classify(Ok(response));
        assert!(matches!(
            outcome,
            RequestOutcome::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(5)
        ));

        let outcome = RequestOutcome::classify(Ok(RawResponse::new(429, "")));
        assert!(matches!(
            outcome,
            RequestOutcome::RateLimited { retry_after: None }
        ));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let now = Utc::now();
        assert_eq!(parse_retry_after("60", now), Some(Duration::from_secs(60)));
        assert_eq!(parse_retry_after(" 0 ", now), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("soon", now), None);
        assert_eq!(
            parse_retry_after("99999999999", now),
            Some(MAX_RETRY_AFTER)
        );
    }

    #[test]
    fn test_parse_retry_after_http_date() {
        let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 30).unwrap();
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:00:00 GMT", now),
            Some(Duration::ZERO)
        );
    }
}
