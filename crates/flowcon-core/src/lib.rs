// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for FlowCon memory capture.
//!
//! This crate provides the error type, the memory and transcript types, and
//! the [`MemorySink`] seam shared by the extractor, the delivery client and
//! the capture orchestrator.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FlowconError;
pub use traits::MemorySink;
pub use types::{
    is_valid_memory, CaptureContext, EntryKind, MemoryRecord, SendMemoryResult, Transcript,
    TranscriptEntry, PR_REFERENCE_KEY,
};
