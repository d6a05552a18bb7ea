// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of memory records from assistant text.
//!
//! The assistant records memories as JSON inside `<memories>` blocks. Its
//! output is untrusted free text, so anything that does not parse or does
//! not have the expected shape is dropped without complaint.

use std::sync::LazyLock;

use flowcon_core::MemoryRecord;
use regex::Regex;
use serde_json::Value;

/// Opening delimiter of a memory block.
pub const OPEN_TAG: &str = "<memories>";

/// Closing delimiter of a memory block.
pub const CLOSE_TAG: &str = "</memories>";

/// Shortest `<memories>...</memories>` span, across newlines.
static MEMORY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<memories>(.*?)</memories>").unwrap());

/// Extracts every valid memory record from `text`.
///
/// Records come out in block order, then array order within a block. Empty
/// blocks, blocks that are not JSON, and candidates without a string
/// `content` and an array `tags` contribute nothing.
pub fn extract_memories(text: &str) -> Vec<MemoryRecord> {
    MEMORY_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|block| parse_block(block.as_str()))
        .collect()
}

/// Parses one block interior into its valid records.
fn parse_block(block: &str) -> Vec<MemoryRecord> {
    let trimmed = block.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let Ok(parsed) = serde_json::from_str::<Value>(trimmed) else {
        return Vec::new();
    };

    let candidates = match parsed {
        Value::Array(items) => items,
        single => vec![single],
    };

    candidates
        .into_iter()
        .filter_map(MemoryRecord::from_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_json(records: &[MemoryRecord]) -> Value {
        serde_json::to_value(records).unwrap()
    }

    #[test]
    fn extracts_single_memory() {
        let response = r#"
Here's my analysis of the PR.

<memories>
{"content": "User prefers React hooks over class components", "tags": ["preferences", "react"]}
</memories>

That's all for now.
"#;
        let memories = extract_memories(response);
        assert_eq!(
            as_json(&memories),
            json!([{
                "content": "User prefers React hooks over class components",
                "tags": ["preferences", "react"]
            }])
        );
    }

    #[test]
    fn extracts_array_in_order() {
        let response = r#"
<memories>
[
  {"content": "Codebase uses strict mode", "tags": ["config"]},
  {"content": "Tests run in CI", "tags": ["testing", "tooling"]}
]
</memories>
"#;
        let memories = extract_memories(response);
        assert_eq!(memories.len(), 2);
        assert_eq!(memories[0].content, "Codebase uses strict mode");
        assert_eq!(memories[1].content, "Tests run in CI");
    }

    #[test]
    fn extracts_across_blocks_in_order() {
        let response = r#"
First observation:
<memories>{"content": "PR adds store integration", "tags": ["feature"]}</memories>
Second observation:
<memories>[{"content": "Integration is non-blocking", "tags": ["architecture"]},
           {"content": "Retries back off", "tags": []}]</memories>
"#;
        let contents: Vec<String> = extract_memories(response)
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(
            contents,
            vec![
                "PR adds store integration",
                "Integration is non-blocking",
                "Retries back off"
            ]
        );
    }

    #[test]
    fn no_block_yields_nothing() {
        assert!(extract_memories("Just a regular response without memories.").is_empty());
        assert!(extract_memories("").is_empty());
    }

    #[test]
    fn empty_and_whitespace_blocks_yield_nothing() {
        assert!(extract_memories("<memories></memories>").is_empty());
        assert!(extract_memories("<memories>  \n\t </memories>").is_empty());
    }

    #[test]
    fn whitespace_around_json_is_trimmed() {
        let response = "<memories>\n\n  {\"content\": \"Memory with whitespace\", \"tags\": [\"test\"]}\n\n</memories>";
        let memories = extract_memories(response);
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].content, "Memory with whitespace");
    }

    #[test]
    fn malformed_block_does_not_affect_siblings() {
        let response = r#"
<memories>{invalid json content}</memories>
<memories>{"content": "survivor", "tags": ["ok"]}</memories>
"#;
        let memories = extract_memories(response);
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].content, "survivor");
    }

    #[test]
    fn nested_extension_fields_are_kept() {
        let response = r#"
<memories>
{
  "content": "Complex memory",
  "tags": ["test"],
  "metadata": {"source": "PR-123", "timestamp": "2024-01-01"}
}
</memories>
"#;
        let memories = extract_memories(response);
        assert_eq!(
            as_json(&memories),
            json!([{
                "content": "Complex memory",
                "tags": ["test"],
                "metadata": {"source": "PR-123", "timestamp": "2024-01-01"}
            }])
        );
    }

    #[test]
    fn invalid_candidates_are_filtered_from_arrays() {
        let response = r#"
<memories>
[
  {"content": "Valid memory", "tags": ["test"]},
  {"content": "Missing tags"},
  {"tags": ["missing-content"]},
  {"content": "Tags not a list", "tags": "nope"},
  "just a string",
  42,
  {"content": "Another valid one", "tags": ["test2"]}
]
</memories>
"#;
        let contents: Vec<String> = extract_memories(response)
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["Valid memory", "Another valid one"]);
    }

    #[test]
    fn each_missing_field_disqualifies_alone() {
        for block in [
            r#"{"tags": ["missing-content"]}"#,
            r#"{"content": "Missing tags field"}"#,
            r#"{"content": "Invalid tags", "tags": "not-an-array"}"#,
            r#"{"content": 7, "tags": []}"#,
        ] {
            let text = format!("<memories>{block}</memories>");
            assert!(extract_memories(&text).is_empty(), "accepted: {block}");
        }
    }

    #[test]
    fn heterogeneous_tags_are_accepted() {
        let memories =
            extract_memories(r#"<memories>{"content": "x", "tags": ["a", 1, null]}</memories>"#);
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].tags, vec![json!("a"), json!(1), json!(null)]);
    }

    #[test]
    fn nested_delimiters_do_not_panic() {
        let text = r#"<memories><memories>{"content": "inner", "tags": []}</memories></memories>"#;
        // The shortest match starts at the outer tag, so its interior is not JSON.
        assert!(extract_memories(text).is_empty());
    }

    #[test]
    fn unterminated_block_is_ignored() {
        let text = r#"<memories>{"content": "never closed", "tags": []}"#;
        assert!(extract_memories(text).is_empty());
    }

    #[test]
    fn deeply_nested_json_is_dropped() {
        let depth = 10_000;
        let text = format!(
            "<memories>{}{}</memories>",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        assert!(extract_memories(&text).is_empty());
    }
}
