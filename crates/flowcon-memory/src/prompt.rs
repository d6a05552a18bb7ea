// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt addendum asking the assistant to record memories.

/// Built-in instructions for documentation suggestions and memory extraction.
///
/// The example block follows the format [`crate::extract_memories`] reads.
pub const DEFAULT_MEMORY_PROMPT: &str = r#"ADDITIONAL TASK: Documentation and Knowledge Extraction

After analyzing the code changes, also:

1. DOCUMENTATION SUGGESTIONS
For each code change that affects documented behavior:
- Identify which doc file(s) need updates
- Generate suggestions in GitHub suggestion format

2. MEMORY EXTRACTION
Extract key knowledge for the AI assistant.
Each memory MUST be:
- 4-6 sentences minimum
- Describe relationships between components
- Include specific names (classes, methods, patterns)

Return memories as JSON array in a <memories> tag.

Example output:
<memories>
[
  {"content": "The AuthService class handles JWT token validation and refresh. It depends on UserRepository for credential verification and uses bcrypt for password hashing. The service implements a singleton pattern to maintain a single connection pool to the auth database. All authentication errors are logged to the security audit trail.", "tags": ["auth", "security", "architecture"]},
  {"content": "API rate limiting is implemented via Redis with a sliding window algorithm. The RateLimiter middleware checks X-API-Key header and enforces 100 req/min per key. Rate limit counters expire after 60 seconds. When a limit is exceeded, the middleware returns a 429 status with a Retry-After header indicating when the client can retry.", "tags": ["api", "rate-limiting", "infrastructure"]}
]
</memories>"#;

/// Returns the configured prompt, or the built-in one when none is set.
///
/// A blank custom prompt counts as unset.
pub fn memory_prompt(custom: Option<&str>) -> &str {
    match custom {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => DEFAULT_MEMORY_PROMPT,
    }
}
