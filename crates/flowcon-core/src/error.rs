// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the FlowCon memory capture pipeline.

use thiserror::Error;

/// The primary error type shared by the FlowCon crates.
///
/// None of these ever reach the host workflow: the capture orchestrator
/// logs them and moves on.
#[derive(Debug, Error)]
pub enum FlowconError {
    /// Configuration errors (invalid settings, unusable credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Delivery to the remote memory store failed in a way the client did not absorb.
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A transcript could not be read or decoded.
    #[error("transcript error: {message}")]
    Transcript {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
