// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery client for the FlowCon memory store.
//!
//! Sends one memory per request with bounded retry and exponential backoff,
//! and never lets a delivery failure reach the caller.

pub mod client;
pub mod error;
pub mod retry;

pub use client::{DeliveryReport, FlowconClient};
pub use error::DeliveryError;
pub use retry::RetryPolicy;
