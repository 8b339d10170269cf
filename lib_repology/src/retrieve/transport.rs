//! # HTTP Transport
//!
//! The single seam between the request engine and the network. Production
//! code uses [`ReqwestTransport`]; tests substitute a scripted transport so
//! retry and pacing behaviour can be checked without a server.

use reqwest::redirect::Policy;
use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::configs::ClientConfig;
use crate::error::RepologyError;

/// Maximum number of redirects followed per attempt.
const MAX_REDIRECTS: usize = 10;

/// Status and body of one HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// The numeric HTTP status code.
    pub status: u16,
    /// The response body as text.
    pub body: String,
}

/// A request that never produced a complete response (connect, timeout, body read).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Creates a transport error from a description of the cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's own message hides the interesting part in the source chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message }
    }
}

/// Performs HTTP GET requests.
pub trait Transport: Send + Sync {
    /// Fetches `url`, returning the response for any status code.
    fn get(&self, url: Url) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: Url) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).get(url)
    }
}

/// `reqwest`-backed transport.
///
/// The connection pool lives as long as this value; dropping it releases the
/// pooled connections.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client that sends `config.user_agent`, follows redirects and
    /// bounds every attempt by `config.timeout`.
    ///
    /// # Errors
    /// Returns `RepologyError::Setup` if the user agent is not a valid header
    /// value or the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, RepologyError> {
        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| RepologyError::Setup(TransportError::from(e).to_string()))?;

        Ok(Self { inner })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: Url) -> Result<RawResponse, TransportError> {
        let response = self.inner.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[tokio::test]
    async fn scripted_transport_replays_then_falls_back() {
        let transport = ScriptedTransport::new(vec![Ok(reply(500, "")), Ok(reply(200, "[]"))]);
        let url = Url::parse("https://repology.org/api/v1/project/x").unwrap();

        assert_eq!(transport.get(url.clone()).await.unwrap().status, 500);
        assert_eq!(transport.get(url.clone()).await.unwrap().status, 200);
        assert!(transport.get(url).await.is_err());
        assert_eq!(transport.call_count(), 3);
    }

    #[test]
    fn reqwest_transport_builds_from_default_config() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn invalid_user_agent_is_a_setup_error() {
        let config = ClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..ClientConfig::default()
        };
        let err = ReqwestTransport::new(&config).unwrap_err();
        assert!(matches!(err, RepologyError::Setup(_)));
    }
}
