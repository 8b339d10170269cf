//! # Request Executor
//!
//! Joins an endpoint onto the base URL, appends the query string and runs the
//! attempt loop: gate → transport → classify → (backoff → gate → …).

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::gate::RequestGate;
use super::retry::{classify, RetryPolicy, Verdict};
use super::transport::Transport;
use crate::error::RepologyError;

/// Query parameters in request order; `None` values are left out of the URL.
pub type QueryParams = Vec<(String, Option<String>)>;

/// Runs requests against one base URL through a shared gate and retry policy.
#[derive(Debug)]
pub struct RequestExecutor<T> {
    /// The HTTP transport.
    transport: T,
    /// The absolute base URL every endpoint is joined onto; ends with `/`.
    base_url: Url,
    /// Spacing between request starts, shared by every call on this executor.
    gate: RequestGate,
    /// Retry budget and backoff bases.
    policy: RetryPolicy,
}

impl<T: Transport> RequestExecutor<T> {
    /// Creates an executor. The gate interval is the policy's rate-limit delay.
    pub fn new(transport: T, base_url: Url, policy: RetryPolicy) -> Self {
        Self {
            transport,
            base_url,
            gate: RequestGate::new(policy.rate_limit_delay),
            policy,
        }
    }

    /// The retry policy in force.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the absolute URL for `endpoint` with the present `params`.
    ///
    /// `endpoint` must already be percent-encoded (see `repology::endpoints`).
    /// Parameter values are form-encoded.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url, RepologyError> {
        let mut url = self.base_url.join(endpoint)?;

        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key.as_str(), v)))
            .collect();

        // query_pairs_mut() would leave a bare '?' behind even with nothing to add
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    /// Fetches `endpoint` and returns the parsed JSON body.
    ///
    /// # Errors
    /// `NotFound` for 404, `RateLimited`/`Server`/`Transport` once the retry
    /// budget is spent, `UnexpectedStatus`/`InvalidJson` immediately.
    pub async fn get_json(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<Value, RepologyError> {
        let url = self.build_url(endpoint, params)?;
        let mut attempt: u32 = 0;

        loop {
            // 1. Respect the spacing between request starts
            self.gate.acquire().await;

            // 2. Execute the request
            debug!(url = %url, attempt, "sending request");
            let outcome = self.transport.get(url.clone()).await;

            // 3. Decide what happens next
            match classify(endpoint, outcome) {
                Verdict::Success(payload) => return Ok(payload),
                Verdict::Fail(err) => return Err(err),
                Verdict::Retry { kind, exhausted } => {
                    if !self.policy.can_retry(attempt) {
                        warn!(url = %url, attempts = attempt + 1, error = %exhausted, "giving up");
                        return Err(exhausted);
                    }

                    let delay = self.policy.backoff(kind, attempt);
                    warn!(
                        url = %url,
                        attempt,
                        ?kind,
                        delay_ms = delay.as_millis() as u64,
                        error = %exhausted,
                        "retrying after backoff"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::transport::mock::{reply, ScriptedTransport};
    use crate::retrieve::transport::TransportError;
    use std::sync::Arc;
    use std::time::Duration;

    fn executor(
        transport: Arc<ScriptedTransport>,
        max_retries: u32,
    ) -> RequestExecutor<Arc<ScriptedTransport>> {
        let policy = RetryPolicy {
            max_retries,
            rate_limit_delay: Duration::from_millis(1100),
            server_backoff: Duration::from_secs(2),
        };
        let base = Url::parse("https://repology.org/api/v1/").unwrap();
        RequestExecutor::new(transport, base, policy)
    }

    fn params(pairs: &[(&str, Option<&str>)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn absent_parameters_are_omitted() {
        let exec = executor(ScriptedTransport::always(200, "[]"), 0);

        let url = exec
            .build_url("projects/", &params(&[("maintainer", None), ("category", Some("www"))]))
            .unwrap();
        assert_eq!(url.as_str(), "https://repology.org/api/v1/projects/?category=www");

        let url = exec.build_url("projects/", &params(&[("maintainer", None)])).unwrap();
        assert_eq!(url.as_str(), "https://repology.org/api/v1/projects/");
    }

    #[test]
    fn parameter_values_are_encoded() {
        let exec = executor(ScriptedTransport::always(200, "[]"), 0);
        let url = exec
            .build_url(
                "projects/",
                &params(&[("maintainer", Some("test@example.com")), ("search", Some("c++ lib/x"))]),
            )
            .unwrap();
        assert_eq!(
            url.query(),
            Some("maintainer=test%40example.com&search=c%2B%2B+lib%2Fx")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_429_exhausts_budget_as_rate_limited() {
        let transport = ScriptedTransport::always(429, "slow down");
        let exec = executor(Arc::clone(&transport), 3);

        let err = exec.get_json("project/x", &Vec::new()).await.unwrap_err();

        assert!(matches!(err, RepologyError::RateLimited));
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_500_exhausts_budget_as_server_error() {
        let transport = ScriptedTransport::always(500, "boom");
        let exec = executor(Arc::clone(&transport), 2);

        let err = exec.get_json("project/x", &Vec::new()).await.unwrap_err();

        match err {
            RepologyError::Server { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_two_server_errors() {
        let transport = ScriptedTransport::new(vec![
            Ok(reply(500, "")),
            Ok(reply(500, "")),
            Ok(reply(200, r#"[1, 2]"#)),
        ]);
        let exec = executor(Arc::clone(&transport), 3);

        let payload = exec.get_json("project/x", &Vec::new()).await.unwrap();

        assert_eq!(payload, serde_json::json!([1, 2]));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let transport = ScriptedTransport::always(400, "bad request");
        let exec = executor(Arc::clone(&transport), 3);

        let err = exec.get_json("project/x", &Vec::new()).await.unwrap_err();

        assert!(matches!(err, RepologyError::UnexpectedStatus { status: 400, .. }));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failures_share_the_budget_with_status_retries() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::new("connection reset")),
            Ok(reply(503, "")),
            Err(TransportError::new("timed out")),
        ]);
        let exec = executor(Arc::clone(&transport), 2);

        let err = exec.get_json("project/x", &Vec::new()).await.unwrap_err();

        match err {
            RepologyError::Transport(cause) => assert_eq!(cause.to_string(), "timed out"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_spacing_follows_the_policy() {
        let transport = ScriptedTransport::new(vec![
            Ok(reply(429, "")),
            Ok(reply(500, "")),
            Ok(reply(200, "{}")),
        ]);
        let exec = executor(Arc::clone(&transport), 3);

        exec.get_json("projects/", &Vec::new()).await.unwrap();

        let calls = transport.calls();
        // 429 on attempt 0 waits 1.1s, 500 on attempt 1 waits 2 × 2s
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(1100));
        assert!(calls[2].at - calls[1].at >= Duration::from_secs(4));
    }
}
