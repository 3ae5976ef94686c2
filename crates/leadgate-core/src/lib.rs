// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadgate lead qualifier.
//!
//! Provides the error type, provider request/response types, and the adapter
//! traits implemented by LLM provider crates and test doubles.

pub mod error;
pub mod traits;
pub mod types;

pub use error::LeadgateError;
pub use traits::{PluginAdapter, ProviderAdapter};
pub use types::{ProviderMessage, ProviderRequest, ProviderResponse, ProviderRole, TokenUsage};
