//! # Error Types
//!
//! `RepologyError` is the single error type returned by every client
//! operation. `NotFound` and `RateLimited` travel up unchanged so callers can
//! match on them directly; every other failure is wrapped in `Context` naming
//! the operation that failed.

use thiserror::Error;

use crate::retrieve::transport::TransportError;

/// Errors produced while talking to the Repology API.
#[derive(Debug, Error)]
pub enum RepologyError {
    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The service kept answering HTTP 429 until the retry budget ran out.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The top-level JSON value had the wrong shape.
    #[error("expected a JSON {expected}, got {found}")]
    ShapeMismatch {
        /// The JSON kind the operation needed.
        expected: &'static str,
        /// The JSON kind the service returned.
        found: &'static str,
    },

    /// The service kept answering with a 5xx status until the retry budget ran out.
    #[error("server error {status}: {body}")]
    Server {
        /// HTTP status code of the last attempt.
        status: u16,
        /// Response body of the last attempt.
        body: String,
    },

    /// The network kept failing until the retry budget ran out.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// Any status the client does not know how to handle.
    #[error("HTTP {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// A 200 response whose body is not valid JSON.
    #[error("invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The request URL could not be assembled.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A caller-supplied name that cannot travel as a single URL path segment.
    /// URL parsing resolves `.` and `..` (percent-encoded or not) as dot segments.
    #[error("invalid path segment {0:?}: '.' and '..' are not valid names")]
    InvalidSegment(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),

    /// A failure annotated with the operation that produced it.
    #[error("failed to {operation}: {source}")]
    Context {
        /// Human readable description, e.g. `get project firefox`.
        operation: String,
        /// The underlying failure.
        #[source]
        source: Box<RepologyError>,
    },
}

/// Coarse classification of a [`RepologyError`], independent of context wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 404.
    NotFound,
    /// HTTP 429 after retries.
    RateLimited,
    /// Wrong top-level JSON shape.
    ShapeMismatch,
    /// HTTP 5xx after retries.
    ServerError,
    /// Network failure after retries.
    TransportError,
    /// Unexpected status or unparsable JSON.
    ProtocolError,
    /// Client construction or URL assembly failure.
    Setup,
}

impl RepologyError {
    /// Attaches operation context, leaving `NotFound` and `RateLimited` untouched.
    pub fn context(self, operation: impl Into<String>) -> Self {
        match self {
            RepologyError::NotFound(_) | RepologyError::RateLimited => self,
            other => RepologyError::Context {
                operation: operation.into(),
                source: Box::new(other),
            },
        }
    }

    /// The kind of the innermost failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepologyError::NotFound(_) => ErrorKind::NotFound,
            RepologyError::RateLimited => ErrorKind::RateLimited,
            RepologyError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            RepologyError::Server { .. } => ErrorKind::ServerError,
            RepologyError::Transport(_) => ErrorKind::TransportError,
            RepologyError::UnexpectedStatus { .. } | RepologyError::InvalidJson(_) => {
                ErrorKind::ProtocolError
            }
            RepologyError::InvalidUrl(_)
            | RepologyError::InvalidSegment(_)
            | RepologyError::Setup(_) => ErrorKind::Setup,
            RepologyError::Context { source, .. } => source.kind(),
        }
    }

    /// The HTTP status carried by the innermost failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RepologyError::NotFound(_) => Some(404),
            RepologyError::RateLimited => Some(429),
            RepologyError::Server { status, .. }
            | RepologyError::UnexpectedStatus { status, .. } => Some(*status),
            RepologyError::Context { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Shorthand for `kind() == ErrorKind::NotFound`.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_rate_limited_are_never_wrapped() {
        let err = RepologyError::NotFound("project/x".into()).context("get project x");
        assert!(matches!(err, RepologyError::NotFound(_)));

        let err = RepologyError::RateLimited.context("list projects");
        assert!(matches!(err, RepologyError::RateLimited));
    }

    #[test]
    fn context_keeps_kind_and_status_reachable() {
        let err = RepologyError::Server {
            status: 503,
            body: "maintenance".into(),
        }
        .context("get repository problems for freebsd");

        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            err.to_string(),
            "failed to get repository problems for freebsd: server error 503: maintenance"
        );
    }

    #[test]
    fn invalid_json_is_a_protocol_error() {
        let parse = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = RepologyError::InvalidJson(parse);
        assert_eq!(err.kind(), ErrorKind::ProtocolError);
        assert_eq!(err.status(), None);
    }
}
