// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink trait for delivering memories to a remote store.

use async_trait::async_trait;

use crate::error::FlowconError;
use crate::types::{MemoryRecord, SendMemoryResult};

/// Destination for captured memories.
///
/// Implementations are expected to absorb transport faults themselves and
/// report success. The `Err` arm is for faults they do not absorb; the
/// orchestrator logs those and continues with the next record.
#[async_trait]
pub trait MemorySink: Send + Sync {
    /// Returns the human-readable name of this sink.
    fn name(&self) -> &str;

    /// Sends one memory record.
    async fn send_memory(&self, record: &MemoryRecord) -> Result<SendMemoryResult, FlowconError>;
}
