// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for Leadgate.
//!
//! Implements [`ProviderAdapter`] over the Anthropic Messages API.

pub mod client;
pub mod types;

use async_trait::async_trait;
use leadgate_config::LeadgateConfig;
use leadgate_core::error::LeadgateError;
use leadgate_core::traits::{PluginAdapter, ProviderAdapter};
use leadgate_core::types::{ProviderRequest, ProviderResponse, TokenUsage};
use tracing::info;

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic Claude provider implementing [`ProviderAdapter`].
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a provider from configuration.
    ///
    /// The API key comes from `anthropic.api_key`, then `ANTHROPIC_API_KEY`.
    pub fn new(config: &LeadgateConfig) -> Result<Self, LeadgateError> {
        let api_key = resolve_api_key(
            config.anthropic.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )?;
        let client = AnthropicClient::new(&api_key, &config.anthropic.api_version)?
            .with_base_url(config.anthropic.base_url.clone());

        info!(model = %config.model.name, "Anthropic provider initialized");
        Ok(Self { client })
    }

    pub fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    fn to_message_request(request: &ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, LeadgateError> {
        let api_request = Self::to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;

        Ok(ProviderResponse {
            content: response.text(),
            id: response.id,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}

/// Picks the configured key, falling back to the environment value.
fn resolve_api_key(
    config_key: Option<&str>,
    env_key: Option<String>,
) -> Result<String, LeadgateError> {
    match config_key {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => env_key.filter(|k| !k.is_empty()).ok_or_else(|| {
            LeadgateError::Config(format!(
                "Anthropic API key not found. Set anthropic.api_key in config or {API_KEY_ENV}."
            ))
        }),
    }
}
