// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for assistant text and transcripts.

use serde_json::{json, Value};

/// Wraps a JSON value in `<memories>` delimiters.
pub fn memory_block(value: &Value) -> String {
    format!("<memories>{value}</memories>")
}

/// A single valid memory block with the given content and tags.
pub fn single_memory(content: &str, tags: &[&str]) -> String {
    memory_block(&json!({"content": content, "tags": tags}))
}

/// An SDK-style assistant entry with one text segment per item.
pub fn assistant_entry(texts: &[&str]) -> Value {
    let content: Vec<Value> = texts
        .iter()
        .map(|text| json!({"type": "text", "text": text}))
        .collect();
    json!({
        "type": "assistant",
        "session_id": "test",
        "parent_tool_use_id": null,
        "message": {"role": "assistant", "content": content}
    })
}

/// An SDK-style user entry with plain string content.
pub fn user_entry(text: &str) -> Value {
    json!({
        "type": "user",
        "session_id": "test",
        "parent_tool_use_id": null,
        "message": {"role": "user", "content": text}
    })
}

/// An SDK-style final result entry.
pub fn result_entry(result: &str) -> Value {
    json!({"type": "result", "subtype": "success", "session_id": "test", "result": result})
}

/// Serializes entries as a JSON array transcript.
pub fn transcript_json(entries: &[Value]) -> String {
    Value::Array(entries.to_vec()).to_string()
}

/// Serializes entries as a JSON Lines transcript.
pub fn transcript_jsonl(entries: &[Value]) -> String {
    entries
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
