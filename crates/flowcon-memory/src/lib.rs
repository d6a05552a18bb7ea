// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory side of FlowCon capture.
//!
//! - **extractor**: pulls `<memories>` JSON blocks out of assistant text and
//!   keeps only structurally valid records
//! - **prompt**: the system prompt addendum that asks the assistant to emit
//!   those blocks

pub mod extractor;
pub mod prompt;

pub use extractor::extract_memories;
pub use prompt::{memory_prompt, DEFAULT_MEMORY_PROMPT};
