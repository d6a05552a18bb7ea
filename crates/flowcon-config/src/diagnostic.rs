// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration errors as miette diagnostics, with typo suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the section does not define.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(flowcon::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: &'static [&'static str],
    },

    /// A value of the wrong type, e.g. a string where a number belongs.
    #[error("invalid type for `{key}`: found {found}, expected {expected}")]
    #[diagnostic(code(flowcon::config::invalid_type))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    /// A value that parsed but is out of range.
    #[error("validation error: {message}")]
    #[diagnostic(code(flowcon::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(flowcon::config::other))]
    Other(String),
}

impl ConfigError {
    /// Classifies one figment error.
    fn from_figment(error: figment::Error) -> Self {
        use figment::error::Kind;

        match &error.kind {
            Kind::UnknownField(field, expected) => ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: *expected,
            },
            Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                found: found.to_string(),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[&str]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid}"),
        None => format!("valid keys: {valid}"),
    }
}

/// Splits a `figment::Error` into one diagnostic per underlying error.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter().map(ConfigError::from_figment).collect()
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Renders diagnostics as plain text, one report after another.
///
/// No color codes, so the result is safe to embed in log lines.
pub fn render_report(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}

/// Writes [`render_report`] to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_report(errors));
}
