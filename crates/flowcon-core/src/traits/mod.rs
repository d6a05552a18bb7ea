// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the capture orchestrator and its transports.
//!
//! Traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod sink;

pub use sink::MemorySink;
