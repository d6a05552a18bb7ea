// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `flowcon capture` command.

use std::path::Path;

use flowcon_capture::CaptureSummary;
use flowcon_config::FlowconConfig;
use flowcon_core::{CaptureContext, FlowconError, Transcript};
use tracing::{debug, warn};

/// Runs the capture pipeline for the transcript at `path`.
///
/// Returns `None` when the transcript could not be read or parsed. Either
/// way the command succeeds.
pub async fn run_capture(
    path: &Path,
    context: &CaptureContext,
    config: &FlowconConfig,
) -> Option<CaptureSummary> {
    if config.store.resolve().is_none() {
        debug!("FlowCon store not configured, skipping memory capture");
        return None;
    }

    let transcript = match read_transcript(path).await {
        Ok(transcript) => transcript,
        Err(e) => {
            warn!(path = %path.display(), "skipping memory capture: {e}");
            return None;
        }
    };

    Some(flowcon_capture::capture(&transcript, context, config).await)
}

async fn read_transcript(path: &Path) -> Result<Transcript, FlowconError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FlowconError::Transcript {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })?;
    Transcript::from_json_str(&raw)
}
