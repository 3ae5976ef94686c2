// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM integrations (Anthropic, OpenAI, test doubles).

use async_trait::async_trait;

use crate::error::LeadgateError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for LLM provider integrations.
///
/// The qualifier treats this as an opaque text-in, text-out boundary: one
/// blocking call per classified message, no timeout or retry imposed by the
/// caller.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, LeadgateError>;
}
