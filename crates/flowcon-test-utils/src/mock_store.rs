// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! wiremock-backed stand-in for the FlowCon memories API.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowcon_config::{FlowconConfig, StoreConfig};

/// Bearer token [`MockStore::config`] configures.
pub const TEST_PAT: &str = "test-token";

/// Group id [`MockStore::config`] configures.
pub const TEST_GROUP_ID: &str = "test-group";

/// A mock FlowCon server answering `POST /api/memories`.
pub struct MockStore {
    server: MockServer,
}

impl MockStore {
    /// Start a store that answers every memory with `200 OK`.
    pub async fn start() -> Self {
        Self::with_status(200).await
    }

    /// Start a store that answers every memory with `status`.
    pub async fn with_status(status: u16) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/memories"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "success": (200..300).contains(&status)
            })))
            .mount(&server)
            .await;
        Self { server }
    }

    /// Base URL of the store.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// A configuration pointing at this store, with millisecond backoff.
    pub fn config(&self) -> FlowconConfig {
        let mut config = FlowconConfig::default();
        config.store = StoreConfig {
            server: Some(self.uri()),
            pat: Some(TEST_PAT.to_string()),
            group_id: Some(TEST_GROUP_ID.to_string()),
        };
        config.delivery.backoff_ms = vec![5, 10, 20];
        config.delivery.request_timeout_secs = 5;
        config
    }

    /// Number of memory requests received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// JSON bodies of the memory requests received so far, in arrival order.
    pub async fn received_memories(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// `Authorization` header values received so far.
    pub async fn received_auth_headers(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.headers.get("authorization"))
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect()
    }
}
