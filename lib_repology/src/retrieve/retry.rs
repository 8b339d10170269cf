//! # Retry Policy
//!
//! Every attempt ends in a [`Verdict`]: a JSON payload, a terminal error, or a
//! retryable condition together with the error to report if the retry budget
//! is already spent. Rate limiting, server errors and network failures are
//! expected conditions here, not exceptions, so the executor drives its loop
//! by matching on the verdict.
//!
//! | Outcome                        | Verdict                                   |
//! |--------------------------------|-------------------------------------------|
//! | 200 + valid JSON               | `Success`                                 |
//! | 200 + malformed JSON           | `Fail(InvalidJson)`                       |
//! | 404                            | `Fail(NotFound)`                          |
//! | 429                            | `Retry(RateLimited)` → `RateLimited`      |
//! | 5xx                            | `Retry(ServerError)` → `Server`           |
//! | anything else                  | `Fail(UnexpectedStatus)`                  |
//! | connection / timeout / read    | `Retry(Network)` → `Transport`            |

use serde_json::Value;
use std::time::Duration;

use super::transport::{RawResponse, TransportError};
use crate::error::RepologyError;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay for server and network failures.
pub const DEFAULT_SERVER_BACKOFF: Duration = Duration::from_secs(2);

/// Why an attempt may be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    ServerError,
    /// The request never produced a response.
    Network,
}

/// Result of classifying one attempt.
#[derive(Debug)]
pub enum Verdict {
    /// The attempt produced a JSON payload.
    Success(Value),
    /// The attempt failed in a way retrying cannot fix.
    Fail(RepologyError),
    /// The attempt may be repeated; `exhausted` is reported once retries run out.
    Retry {
        /// What went wrong.
        kind: RetryKind,
        /// The error to surface when no retries remain.
        exhausted: RepologyError,
    },
}

/// Classifies the outcome of a single attempt.
///
/// # Arguments
/// * `endpoint` - The endpoint path, used to describe a 404.
/// * `outcome` - The raw response, or the transport failure.
pub fn classify(endpoint: &str, outcome: Result<RawResponse, TransportError>) -> Verdict {
    let response = match outcome {
        Ok(response) => response,
        Err(cause) => {
            return Verdict::Retry {
                kind: RetryKind::Network,
                exhausted: RepologyError::Transport(cause),
            }
        }
    };

    match response.status {
        200 => match serde_json::from_str::<Value>(&response.body) {
            Ok(payload) => Verdict::Success(payload),
            Err(e) => Verdict::Fail(RepologyError::InvalidJson(e)),
        },
        404 => Verdict::Fail(RepologyError::NotFound(endpoint.to_string())),
        429 => Verdict::Retry {
            kind: RetryKind::RateLimited,
            exhausted: RepologyError::RateLimited,
        },
        status if status >= 500 => Verdict::Retry {
            kind: RetryKind::ServerError,
            exhausted: RepologyError::Server {
                status,
                body: response.body,
            },
        },
        status => Verdict::Fail(RepologyError::UnexpectedStatus {
            status,
            body: response.body,
        }),
    }
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    /// Base delay for HTTP 429; also the gate interval.
    pub rate_limit_delay: Duration,
    /// Base delay for 5xx responses and network failures.
    pub server_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            rate_limit_delay: Duration::from_millis(1100),
            server_backoff: DEFAULT_SERVER_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows the zero-based `attempt`:
    /// `2^attempt × base`, saturating instead of overflowing.
    pub fn backoff(&self, kind: RetryKind, attempt: u32) -> Duration {
        let base = match kind {
            RetryKind::RateLimited => self.rate_limit_delay,
            RetryKind::ServerError | RetryKind::Network => self.server_backoff,
        };
        base.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether another attempt may follow the zero-based `attempt`.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn ok_with_json_is_success() {
        match classify("project/x", response(200, r#"[{"a": 1}]"#)) {
            Verdict::Success(v) => assert!(v.is_array()),
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[test]
    fn ok_with_garbage_fails_without_retry() {
        assert!(matches!(
            classify("project/x", response(200, "invalid json")),
            Verdict::Fail(RepologyError::InvalidJson(_))
        ));
    }

    #[test]
    fn not_found_names_the_endpoint() {
        match classify("project/nonexistent", response(404, "")) {
            Verdict::Fail(RepologyError::NotFound(what)) => assert_eq!(what, "project/nonexistent"),
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[test]
    fn throttling_and_server_errors_are_retryable() {
        assert!(matches!(
            classify("p", response(429, "")),
            Verdict::Retry { kind: RetryKind::RateLimited, exhausted: RepologyError::RateLimited }
        ));

        match classify("p", response(503, "down for maintenance")) {
            Verdict::Retry {
                kind: RetryKind::ServerError,
                exhausted: RepologyError::Server { status, body },
            } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down for maintenance");
            }
            other => panic!("unexpected verdict: {:?}", other),
        }
    }

    #[test]
    fn network_failures_are_retryable() {
        let verdict = classify("p", Err(TransportError::new("connection refused")));
        assert!(matches!(
            verdict,
            Verdict::Retry { kind: RetryKind::Network, exhausted: RepologyError::Transport(_) }
        ));
    }

    #[test]
    fn other_statuses_fail_immediately() {
        for status in [201, 204, 301, 400, 403, 418] {
            match classify("p", response(status, "nope")) {
                Verdict::Fail(RepologyError::UnexpectedStatus { status: s, body }) => {
                    assert_eq!(s, status);
                    assert_eq!(body, "nope");
                }
                other => panic!("status {status}: unexpected verdict {:?}", other),
            }
        }
    }

    #[test]
    fn backoff_doubles_from_the_right_base() {
        let policy = RetryPolicy {
            max_retries: 3,
            rate_limit_delay: Duration::from_millis(1100),
            server_backoff: Duration::from_secs(2),
        };

        assert_eq!(policy.backoff(RetryKind::RateLimited, 0), Duration::from_millis(1100));
        assert_eq!(policy.backoff(RetryKind::RateLimited, 2), Duration::from_millis(4400));
        assert_eq!(policy.backoff(RetryKind::ServerError, 0), Duration::from_secs(2));
        assert_eq!(policy.backoff(RetryKind::ServerError, 1), Duration::from_secs(4));
        assert_eq!(policy.backoff(RetryKind::Network, 2), Duration::from_secs(8));
    }

    #[test]
    fn backoff_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff(RetryKind::Network, 200),
            Duration::from_secs(2) * u32::MAX
        );
    }

    #[test]
    fn retry_budget() {
        let policy = RetryPolicy {
            max_retries: 2,
            ..RetryPolicy::default()
        };
        assert!(policy.can_retry(0));
        assert!(policy.can_retry(1));
        assert!(!policy.can_retry(2));
    }
}
