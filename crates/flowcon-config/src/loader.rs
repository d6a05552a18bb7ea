// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./flowcon.toml` > `~/.config/flowcon/flowcon.toml` > `/etc/flowcon/flowcon.toml`
//! with environment variable overrides via the `FLOWCON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FlowconConfig;

/// Environment variables copied verbatim into string settings.
///
/// These never go through figment's value parser, so a PAT like `00123456`
/// or a prompt like `[draft]` arrives exactly as exported.
pub const STRING_ENV_VARS: &[(&str, &str)] = &[
    ("FLOWCON_SERVER", "store.server"),
    ("FLOWCON_PAT", "store.pat"),
    ("FLOWCON_GROUP_ID", "store.group_id"),
    ("FLOWCON_MEMORY_PROMPT", "capture.memory_prompt"),
    ("FLOWCON_LOG_LEVEL", "log_level"),
];

/// Numeric environment keys (prefix stripped, lowercased), parsed by figment.
///
/// Other `FLOWCON_*` variables belong to the host action and are ignored.
pub const ENV_KEYS: &[&str] = &["delivery_max_attempts", "delivery_request_timeout_secs"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/flowcon/flowcon.toml` (system-wide)
/// 3. `~/.config/flowcon/flowcon.toml` (user XDG config)
/// 4. `./flowcon.toml` (local directory)
/// 5. `FLOWCON_*` environment variables
pub fn load_config() -> Result<FlowconConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<FlowconConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FlowconConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FlowconConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FlowconConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(string_env_provider())
        .extract()
}

/// Build the Figment used for the standard lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FlowconConfig::default()))
        .merge(Toml::file("/etc/flowcon/flowcon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("flowcon/flowcon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("flowcon.toml"))
        .merge(env_provider())
        .merge(string_env_provider())
}

/// Environment provider for the numeric `FLOWCON_DELIVERY_*` settings.
///
/// Uses `Env::map()` rather than `Env::split("_")` because the field names
/// themselves contain underscores.
fn env_provider() -> Env {
    Env::prefixed("FLOWCON_")
        .filter(|key| {
            ENV_KEYS
                .iter()
                .any(|known| key.as_str().eq_ignore_ascii_case(known))
        })
        .map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("delivery_", "delivery.", 1)
                .into()
        })
}

/// The [`STRING_ENV_VARS`] that are set, as raw strings.
fn string_env_provider() -> Figment {
    STRING_ENV_VARS
        .iter()
        .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (*key, value)))
        .fold(Figment::new(), |figment, (key, value)| {
            figment.merge(Serialized::default(key, value))
        })
}
