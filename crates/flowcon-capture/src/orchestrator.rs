// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives one capture run: extract memories from a transcript, attach the
//! pull request reference, and deliver them one by one.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use flowcon_client::FlowconClient;
use flowcon_config::FlowconConfig;
use flowcon_core::{
    CaptureContext, FlowconError, MemoryRecord, MemorySink, SendMemoryResult, Transcript,
    PR_REFERENCE_KEY,
};
use flowcon_memory::extract_memories;
use futures::FutureExt;
use tracing::{debug, info, warn};

/// What a capture run did. Never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    /// False when the store is not configured and nothing was attempted.
    pub enabled: bool,
    /// Valid memories found in the transcript.
    pub extracted: usize,
    /// Memories the sink accepted.
    pub delivered: usize,
    /// Memories whose delivery faulted.
    pub failed: usize,
}

impl CaptureSummary {
    fn disabled() -> Self {
        Self::default()
    }

    fn from_outcomes(outcomes: &[Result<SendMemoryResult, FlowconError>]) -> Self {
        let delivered = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            enabled: true,
            extracted: outcomes.len(),
            delivered,
            failed: outcomes.len() - delivered,
        }
    }
}

/// Sends the memories found in `transcript` to the configured FlowCon store.
///
/// Returns immediately, without touching the network, unless the store
/// server, PAT and group id are all configured. Never fails.
pub async fn capture(
    transcript: &Transcript,
    context: &CaptureContext,
    config: &FlowconConfig,
) -> CaptureSummary {
    let Some(settings) = config.store.resolve() else {
        debug!("FlowCon store not configured, skipping memory capture");
        return CaptureSummary::disabled();
    };

    let client = match FlowconClient::from_settings(&settings, &config.delivery) {
        Ok(client) => client,
        Err(e) => {
            warn!("failed to create FlowCon client: {e}");
            return CaptureSummary {
                enabled: true,
                ..CaptureSummary::default()
            };
        }
    };

    capture_with_sink(transcript, context, &client).await
}

/// Same as [`capture`], with an explicit sink and no configuration gate.
///
/// Records are delivered sequentially in transcript order. A sink error or
/// panic for one record is logged and the loop moves on.
pub async fn capture_with_sink(
    transcript: &Transcript,
    context: &CaptureContext,
    sink: &dyn MemorySink,
) -> CaptureSummary {
    let memories = collect_memories(transcript);
    debug!(count = memories.len(), sink = sink.name(), "extracted memories");

    let pr_reference = context.to_value();
    let mut outcomes = Vec::with_capacity(memories.len());

    for memory in &memories {
        let enriched = memory.enriched(PR_REFERENCE_KEY, pr_reference.clone());
        let outcome = deliver_isolated(sink, &enriched).await;
        if let Err(e) = &outcome {
            warn!(sink = sink.name(), "Failed to send memory to FlowCon: {e}");
        }
        outcomes.push(outcome);
    }

    let summary = CaptureSummary::from_outcomes(&outcomes);
    if summary.extracted > 0 {
        info!(
            extracted = summary.extracted,
            delivered = summary.delivered,
            failed = summary.failed,
            "memory capture finished"
        );
    }
    summary
}

/// Every valid memory in the assistant's text segments, in transcript order.
pub fn collect_memories(transcript: &Transcript) -> Vec<MemoryRecord> {
    transcript
        .assistant_texts()
        .flat_map(extract_memories)
        .collect()
}

/// Runs one delivery, turning a panic in the sink into an error.
async fn deliver_isolated(
    sink: &dyn MemorySink,
    record: &MemoryRecord,
) -> Result<SendMemoryResult, FlowconError> {
    match AssertUnwindSafe(sink.send_memory(record)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(FlowconError::Internal(format!(
            "memory sink panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
