// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for FlowCon integration tests.
//!
//! Provides mock sinks, a mock memory store and transcript builders for fast,
//! deterministic tests without a real FlowCon server.
//!
//! # Components
//!
//! - [`MockSink`] - Scripted [`flowcon_core::MemorySink`] that records what it receives
//! - [`MockStore`] - wiremock-backed `/api/memories` endpoint
//! - [`transcript`] - Builders for memory blocks and SDK-style transcripts

pub mod mock_sink;
pub mod mock_store;
pub mod transcript;

pub use mock_sink::{MockOutcome, MockSink};
pub use mock_store::MockStore;
