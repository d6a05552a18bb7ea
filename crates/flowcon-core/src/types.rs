// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the extractor, the delivery client, and the
//! capture orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FlowconError;

/// Key under which the capture context is attached to every delivered record.
pub const PR_REFERENCE_KEY: &str = "pr_reference";

/// A structured fact the assistant chose to record.
///
/// `content` and `tags` are the only fields the pipeline understands. Every
/// other key found in the source JSON is kept in `extra` and serialized back
/// alongside them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// The fact, as natural-language text.
    pub content: String,
    /// Labels for the fact. Element types are not enforced.
    pub tags: Vec<Value>,
    /// Extension fields, forwarded verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemoryRecord {
    /// Creates a record with string tags and no extension fields.
    pub fn new(content: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            content: content.into(),
            tags: tags.into_iter().map(|t| Value::String(t.into())).collect(),
            extra: Map::new(),
        }
    }

    /// Builds a record from an arbitrary JSON value.
    ///
    /// Returns `None` unless the value satisfies [`is_valid_memory`].
    pub fn from_value(value: Value) -> Option<Self> {
        if !is_valid_memory(&value) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Returns a copy of this record with `key` set to `value`.
    ///
    /// Existing fields always win: if the record already carries `key`
    /// (including `content` or `tags`), the copy is returned unchanged.
    pub fn enriched(&self, key: &str, value: Value) -> Self {
        let mut record = self.clone();
        if key == "content" || key == "tags" || record.extra.contains_key(key) {
            debug!(key, "record already carries field, keeping original value");
            return record;
        }
        record.extra.insert(key.to_string(), value);
        record
    }
}

/// Structural check applied to every candidate memory.
///
/// A candidate is valid iff it is an object whose `content` is a string and
/// whose `tags` is an array.
pub fn is_valid_memory(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            matches!(map.get("content"), Some(Value::String(_)))
                && matches!(map.get("tags"), Some(Value::Array(_)))
        }
        _ => false,
    }
}

/// Metadata identifying the pull request a capture run belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureContext {
    pub pr_number: String,
    pub repo_owner: String,
    pub repo_name: String,
}

impl CaptureContext {
    pub fn new(
        pr_number: impl Into<String>,
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
    ) -> Self {
        Self {
            pr_number: pr_number.into(),
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
        }
    }

    /// JSON form attached to records under [`PR_REFERENCE_KEY`].
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "pr_number": self.pr_number,
            "repo_owner": self.repo_owner,
            "repo_name": self.repo_name,
        })
    }
}

/// Outcome of sending one memory, as seen by callers.
///
/// The delivery client reports `success: true` even after exhausting its
/// retries, so the host workflow is never affected by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMemoryResult {
    pub success: bool,
}

impl SendMemoryResult {
    pub fn delivered() -> Self {
        Self { success: true }
    }
}

/// The kind of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Assistant,
    User,
    System,
    Result,
    #[serde(other)]
    Other,
}

/// One turn of an assistant session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ConversationMessage>,
}

impl TranscriptEntry {
    /// An assistant entry whose content is the given text segments.
    pub fn assistant_text<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: EntryKind::Assistant,
            message: Some(ConversationMessage {
                role: "assistant".to_string(),
                content: MessageContent::Segments(
                    texts.into_iter().map(ContentSegment::text).collect(),
                ),
            }),
        }
    }

    /// A user entry with plain string content.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::User,
            message: Some(ConversationMessage {
                role: "user".to_string(),
                content: MessageContent::Other(Value::String(text.into())),
            }),
        }
    }
}

/// The API message carried by a conversational entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

/// Message content: either a list of typed segments or anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Segments(Vec<ContentSegment>),
    Other(Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Other(Value::Null)
    }
}

/// One typed piece of message content (text, tool use, tool result, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSegment {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentSegment {
    pub fn text(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("text".to_string(), Value::String(text.into()));
        Self {
            kind: "text".to_string(),
            fields,
        }
    }

    /// The segment's text, if it is a text segment carrying a string.
    pub fn as_text(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        self.fields.get("text").and_then(Value::as_str)
    }
}

/// An ordered list of transcript entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    /// Parses a transcript from a JSON array or from JSON Lines.
    ///
    /// Entries that do not decode are skipped. Only input that is neither an
    /// array nor line-delimited JSON is an error.
    pub fn from_json_str(input: &str) -> Result<Self, FlowconError> {
        let trimmed = input.trim_start();
        if trimmed.starts_with('[') {
            let values: Vec<Value> =
                serde_json::from_str(trimmed).map_err(|e| FlowconError::Transcript {
                    message: format!("transcript is not a JSON array: {e}"),
                    source: Some(Box::new(e)),
                })?;
            let entries = values
                .into_iter()
                .enumerate()
                .filter_map(|(i, value)| decode_entry(i, value))
                .collect();
            return Ok(Self { entries });
        }

        let mut entries = Vec::new();
        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => entries.extend(decode_entry(i, value)),
                Err(e) => debug!(line = i + 1, "skipping unparsable transcript line: {e}"),
            }
        }
        Ok(Self { entries })
    }

    /// Text of every text segment in assistant entries, in transcript order.
    pub fn assistant_texts(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Assistant)
            .filter_map(|entry| entry.message.as_ref())
            .filter_map(|message| match &message.content {
                MessageContent::Segments(segments) => Some(segments),
                MessageContent::Other(_) => None,
            })
            .flatten()
            .filter_map(ContentSegment::as_text)
    }
}

fn decode_entry(index: usize, value: Value) -> Option<TranscriptEntry> {
    match serde_json::from_value(value) {
        Ok(entry) => Some(entry),
        Err(e) => {
            debug!(index, "skipping undecodable transcript entry: {e}");
            None
        }
    }
}
