// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the FlowCon memories API.
//!
//! Provides [`FlowconClient`], which posts one memory at a time to
//! `{server}/api/memories` and retries failed attempts on a backoff schedule.
//! Exhausting the retries is reported to callers as success.

use std::time::Duration;

use async_trait::async_trait;
use flowcon_config::{DeliveryConfig, StoreSettings};
use flowcon_core::{FlowconError, MemoryRecord, MemorySink, SendMemoryResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::retry::RetryPolicy;

/// Path of the memories endpoint, relative to the server URL.
const MEMORIES_PATH: &str = "/api/memories";

/// Result of the retry loop for one memory.
///
/// This is the honest outcome; [`FlowconClient::send_memory`] is the only
/// place it is turned into the always-successful [`SendMemoryResult`].
#[derive(Debug)]
pub struct DeliveryReport {
    /// Attempts actually made.
    pub attempts: u32,
    /// Whether an attempt got a 2xx response.
    pub delivered: bool,
    /// The failure of the final attempt, when nothing was delivered.
    pub last_error: Option<DeliveryError>,
}

/// HTTP client for the FlowCon memory store.
#[derive(Debug, Clone)]
pub struct FlowconClient {
    client: reqwest::Client,
    endpoint: String,
    policy: RetryPolicy,
}

impl FlowconClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `server` - Base URL of the store; a trailing `/` is ignored
    /// * `pat` - Personal access token sent as `Authorization: Bearer`
    /// * `policy` - Attempt budget and backoff schedule
    /// * `timeout` - Transport timeout for a single attempt
    pub fn new(
        server: &str,
        pat: &SecretString,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, FlowconError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", pat.expose_secret()))
            .map_err(|e| FlowconError::Config(format!("invalid PAT header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FlowconError::Delivery {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}{MEMORIES_PATH}", server.trim_end_matches('/')),
            policy,
        })
    }

    /// Creates a client from resolved store settings and delivery config.
    pub fn from_settings(
        settings: &StoreSettings,
        delivery: &DeliveryConfig,
    ) -> Result<Self, FlowconError> {
        Self::new(
            &settings.server,
            &settings.pat,
            RetryPolicy::from(delivery),
            Duration::from_secs(delivery.request_timeout_secs),
        )
    }

    /// The full URL memories are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a memory, reporting success no matter how delivery went.
    ///
    /// Failed attempts are retried per the [`RetryPolicy`]. When every
    /// attempt fails the memory is dropped with a warning.
    pub async fn send_memory(&self, record: &MemoryRecord) -> SendMemoryResult {
        let report = self.deliver(record).await;
        if !report.delivered {
            let error = report
                .last_error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            warn!(
                attempts = report.attempts,
                error = %error,
                "memory not delivered to FlowCon, continuing"
            );
        }
        SendMemoryResult::delivered()
    }

    /// Runs the retry loop for one memory and reports what really happened.
    pub async fn deliver(&self, record: &MemoryRecord) -> DeliveryReport {
        let max_attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(record).await {
                Ok(status) => {
                    debug!(status = %status, attempt, "memory delivered");
                    return DeliveryReport {
                        attempts: attempt,
                        delivered: true,
                        last_error: None,
                    };
                }
                Err(e) => {
                    debug!(attempt, error = %e, "memory delivery attempt failed");
                    last_error = Some(e);
                    if attempt < max_attempts {
                        let delay = self.policy.delay_after(attempt);
                        debug!(?delay, "backing off before retry");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        DeliveryReport {
            attempts: max_attempts,
            delivered: false,
            last_error,
        }
    }

    /// One POST. Any non-2xx status is a failure.
    async fn attempt(&self, record: &MemoryRecord) -> Result<reqwest::StatusCode, DeliveryError> {
        let body = serde_json::to_vec(record)?;
        let response = self.client.post(&self.endpoint).body(body).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(status)
        } else {
            Err(DeliveryError::Status(status))
        }
    }
}

#[async_trait]
impl MemorySink for FlowconClient {
    fn name(&self) -> &str {
        "flowcon"
    }

    async fn send_memory(&self, record: &MemoryRecord) -> Result<SendMemoryResult, FlowconError> {
        Ok(FlowconClient::send_memory(self, record).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(
            3,
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(40),
            ],
        )
    }

    fn test_client(base_url: &str, pat: &str) -> FlowconClient {
        FlowconClient::new(
            base_url,
            &SecretString::from(pat.to_string()),
            fast_policy(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = test_client("http://localhost:8080/", "token");
        assert_eq!(client.endpoint(), "http://localhost:8080/api/memories");
        let client = test_client("http://localhost:8080", "token");
        assert_eq!(client.endpoint(), "http://localhost:8080/api/memories");
    }

    #[test]
    fn pat_with_newline_is_rejected() {
        let result = FlowconClient::new(
            "http://localhost:8080",
            &SecretString::from("bad\ntoken".to_string()),
            fast_policy(),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(FlowconError::Config(_))));
    }

    #[test]
    fn debug_output_hides_pat() {
        let client = test_client("http://localhost:8080", "secret-pat-123");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-pat-123"), "got: {debug}");
    }

    #[tokio::test]
    async fn posts_to_memories_endpoint_with_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .and(header("authorization", "Bearer secret-pat-123"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), "secret-pat-123");
        let report = client.deliver(&MemoryRecord::new("test memory", ["test"])).await;
        assert!(report.delivered);
        assert_eq!(report.attempts, 1);
    }

    #[tokio::test]
    async fn body_is_the_record_with_extension_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let mut record = MemoryRecord::new("important memory", ["work", "urgent"]);
        record
            .extra
            .insert("metadata".to_string(), json!({"source": "PR-1"}));

        let client = test_client(&server.uri(), "token");
        assert!(client.send_memory(&record).await.success);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body,
            json!({
                "content": "important memory",
                "tags": ["work", "urgent"],
                "metadata": {"source": "PR-1"}
            })
        );
    }

    #[tokio::test]
    async fn retries_until_success_on_third_attempt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), "token");
        let started = std::time::Instant::now();
        let report = client.deliver(&MemoryRecord::new("test", Vec::<String>::new())).await;

        assert!(report.delivered);
        assert_eq!(report.attempts, 3);
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn first_attempt_success_does_not_wait() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = FlowconClient::new(
            &server.uri(),
            &SecretString::from("token".to_string()),
            RetryPolicy::new(3, vec![Duration::from_secs(30)]),
            Duration::from_secs(5),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let report = client.deliver(&MemoryRecord::new("test", ["a"])).await;
        assert!(report.delivered);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn exhausts_three_attempts_on_server_error_but_reports_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Internal error"})))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), "token");
        let report = client.deliver(&MemoryRecord::new("test", ["a"])).await;
        assert!(!report.delivered);
        assert_eq!(report.attempts, 3);
        assert!(matches!(
            report.last_error,
            Some(DeliveryError::Status(status)) if status.as_u16() == 500
        ));

        let result = client.send_memory(&MemoryRecord::new("test", ["a"])).await;
        assert_eq!(result, SendMemoryResult { success: true });
    }

    #[tokio::test]
    async fn not_found_is_retried_like_any_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), "token");
        assert!(client.send_memory(&MemoryRecord::new("test", ["a"])).await.success);
    }

    #[tokio::test]
    async fn unreachable_server_still_reports_success() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = test_client(&format!("http://{addr}"), "token");
        let report = client.deliver(&MemoryRecord::new("test", ["a"])).await;
        assert!(!report.delivered);
        assert_eq!(report.attempts, 3);
        assert!(matches!(report.last_error, Some(DeliveryError::Transport(_))));

        assert!(client.send_memory(&MemoryRecord::new("test", ["a"])).await.success);
    }

    #[tokio::test]
    async fn slow_store_times_out_per_attempt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = FlowconClient::new(
            &server.uri(),
            &SecretString::from("token".to_string()),
            fast_policy(),
            Duration::from_millis(100),
        )
        .unwrap();

        let report = client.deliver(&MemoryRecord::new("test", ["a"])).await;
        assert!(!report.delivered);
        assert_eq!(report.attempts, 3);
        assert!(matches!(report.last_error, Some(DeliveryError::Transport(ref e)) if e.is_timeout()));
    }

    #[tokio::test]
    #[traced_test]
    async fn exhausted_retries_are_logged_as_warning() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), "token");
        client.send_memory(&MemoryRecord::new("test", ["a"])).await;

        assert!(logs_contain("memory not delivered to FlowCon"));
        assert!(logs_contain("502"));
    }

    #[tokio::test]
    async fn sink_impl_never_errors() {
        let client = test_client("http://127.0.0.1:1", "token");
        let sink: &dyn MemorySink = &client;
        assert_eq!(sink.name(), "flowcon");
        let result = sink.send_memory(&MemoryRecord::new("test", ["a"])).await;
        assert!(matches!(result, Ok(SendMemoryResult { success: true })));
    }
}
