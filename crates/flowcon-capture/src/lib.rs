// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capture orchestrator for FlowCon memories.
//!
//! Ties the extractor and the delivery client together for one assistant
//! run. The whole pipeline is a side channel: it is a no-op when the store
//! is not configured, and no failure inside it reaches the caller.

pub mod orchestrator;

pub use orchestrator::{capture, capture_with_sink, collect_memories, CaptureSummary};
