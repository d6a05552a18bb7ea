// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-attempt delivery failures.

use thiserror::Error;

/// Why a single delivery attempt failed.
///
/// Every variant counts the same for retry purposes.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Connection failure, timeout, or other transport fault.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("store returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The record could not be encoded as JSON.
    #[error("failed to encode memory: {0}")]
    Serialize(#[from] serde_json::Error),
}
