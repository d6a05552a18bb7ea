// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for FlowCon memory capture.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `FLOWCON_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use flowcon_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! if config.store.resolve().is_none() {
//!     println!("memory capture disabled");
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, render_report, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CaptureConfig, DeliveryConfig, FlowconConfig, StoreConfig, StoreSettings};

/// Load configuration from the XDG hierarchy and environment, then validate it.
pub fn load_and_validate() -> Result<FlowconConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<FlowconConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<FlowconConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

fn finish(
    loaded: Result<FlowconConfig, figment::Error>,
) -> Result<FlowconConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
