// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leadgate.
//!
//! - [`MockProvider`] - scripted LLM provider with failure injection and
//!   request capture
//! - [`classification_reply`] - builds a well-formed classification JSON reply

pub mod mock_provider;

pub use mock_provider::{MockProvider, MockReply, classification_reply};
