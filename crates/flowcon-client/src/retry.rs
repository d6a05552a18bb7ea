// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry schedule for memory deliveries.

use std::time::Duration;

use flowcon_config::DeliveryConfig;

/// How many times to attempt a delivery and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Vec<Duration>,
}

impl RetryPolicy {
    /// Creates a policy. At least one attempt is always made, and an empty
    /// schedule means retries follow immediately.
    pub fn new(max_attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    ///
    /// Attempts past the end of the schedule reuse its last entry.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let index = attempt.saturating_sub(1) as usize;
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    /// Three attempts with 1s, 2s, 4s exponential backoff.
    fn default() -> Self {
        Self::new(
            3,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        )
    }
}

impl From<&DeliveryConfig> for RetryPolicy {
    fn from(config: &DeliveryConfig) -> Self {
        Self::new(
            config.max_attempts,
            config
                .backoff_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        )
    }
}
