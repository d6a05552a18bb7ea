// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::FlowconConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one. Missing store
/// values are not errors: they just leave the pipeline disabled.
pub fn validate_config(config: &FlowconConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.delivery.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: "delivery.max_attempts must be at least 1".to_string(),
        });
    }

    if config.delivery.backoff_ms.is_empty() {
        errors.push(ConfigError::Validation {
            message: "delivery.backoff_ms must list at least one delay".to_string(),
        });
    }

    if config.delivery.request_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: "delivery.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Some(server) = config.store.server.as_deref().map(str::trim)
        && !server.is_empty()
        && !(server.starts_with("http://") || server.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("store.server `{server}` must start with http:// or https://"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
