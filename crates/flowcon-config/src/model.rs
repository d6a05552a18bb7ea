// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for FlowCon memory capture.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level FlowCon configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional; with no store settings the
/// capture pipeline stays disabled.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FlowconConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Remote memory store connection settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Retry and timeout settings for deliveries.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Memory capture behavior.
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Default for FlowconConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store: StoreConfig::default(),
            delivery: DeliveryConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote memory store configuration.
///
/// All three values must be present for the pipeline to run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the FlowCon server.
    #[serde(default, deserialize_with = "lenient_string")]
    pub server: Option<String>,

    /// Personal access token sent as a bearer credential.
    #[serde(default, deserialize_with = "lenient_string")]
    pub pat: Option<String>,

    /// Logical grouping identifier. Only gates activation; it is not sent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_id: Option<String>,
}

impl StoreConfig {
    /// Resolves the settings needed to deliver memories.
    ///
    /// Returns `None` when any value is missing or blank, which is the
    /// normal "feature disabled" state.
    pub fn resolve(&self) -> Option<StoreSettings> {
        let server = non_blank(self.server.as_deref())?;
        let pat = non_blank(self.pat.as_deref())?;
        let group_id = non_blank(self.group_id.as_deref())?;
        Some(StoreSettings {
            server: server.to_string(),
            pat: SecretString::from(pat.to_string()),
            group_id: group_id.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Fully resolved store settings. The PAT never appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub server: String,
    pub pat: SecretString,
    pub group_id: String,
}

/// Delivery retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Total attempts per memory, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after failed attempt N (1-based) is `backoff_ms[N - 1]`;
    /// attempts beyond the list reuse its last entry.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: Vec<u64>,

    /// Transport timeout for a single attempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> Vec<u64> {
    vec![1000, 2000, 4000]
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Memory capture configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// Replaces the built-in memory extraction prompt when set.
    #[serde(default)]
    pub memory_prompt: Option<String>,
}

/// Scalar forms accepted where a string is expected.
///
/// Lets a TOML file write `group_id = 42` without quotes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
