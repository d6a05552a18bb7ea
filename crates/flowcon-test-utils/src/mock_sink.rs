// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted memory sink for deterministic orchestrator tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use flowcon_core::{FlowconError, MemoryRecord, MemorySink, SendMemoryResult};

/// What the mock sink does for one `send_memory` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Accept the record.
    Succeed,
    /// Return a delivery error.
    Fail(String),
    /// Panic inside the sink future.
    Panic(String),
}

/// A sink that records every record it is given.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, the
/// record is accepted.
pub struct MockSink {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    received: Arc<Mutex<Vec<MemoryRecord>>>,
}

impl MockSink {
    /// Create a sink that accepts everything.
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Create a sink that plays the given outcomes in order.
    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every record passed to `send_memory`, in call order, including ones
    /// the sink then failed on.
    pub async fn received(&self) -> Vec<MemoryRecord> {
        self.received.lock().await.clone()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemorySink for MockSink {
    fn name(&self) -> &str {
        "mock-sink"
    }

    async fn send_memory(&self, record: &MemoryRecord) -> Result<SendMemoryResult, FlowconError> {
        self.received.lock().await.push(record.clone());
        let outcome = self
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(MockOutcome::Succeed);
        match outcome {
            MockOutcome::Succeed => Ok(SendMemoryResult::delivered()),
            MockOutcome::Fail(message) => Err(FlowconError::Delivery {
                message,
                source: None,
            }),
            MockOutcome::Panic(message) => panic!("{message}"),
        }
    }
}
