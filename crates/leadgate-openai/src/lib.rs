// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for Leadgate.

pub mod client;
pub mod types;

use async_trait::async_trait;
use leadgate_config::LeadgateConfig;
use leadgate_core::error::LeadgateError;
use leadgate_core::traits::{PluginAdapter, ProviderAdapter};
use leadgate_core::types::{ProviderRequest, ProviderResponse, TokenUsage};
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::{CompletionRequest, Message};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI Chat Completions provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from configuration. The API key comes from
    /// `openai.api_key`, then `OPENAI_API_KEY`.
    pub fn new(config: &LeadgateConfig) -> Result<Self, LeadgateError> {
        let api_key = resolve_api_key(config.openai.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())?;
        let client = OpenAiClient::new(&api_key)?.with_base_url(config.openai.base_url.clone());
        info!(model = %config.model.name, "OpenAI provider initialized");
        Ok(Self { client })
    }

    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

/// The system prompt, when present, becomes a leading `system` message.
fn to_completion_request(request: &ProviderRequest) -> CompletionRequest {
    let system = request.system_prompt.as_ref().map(|text| Message {
        role: "system".to_string(),
        content: Some(text.clone()),
    });
    let messages = system
        .into_iter()
        .chain(request.messages.iter().map(|m| Message {
            role: m.role.to_string(),
            content: Some(m.content.clone()),
        }))
        .collect();

    CompletionRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, LeadgateError> {
        let response = self.client.chat(&to_completion_request(&request)).await?;
        let usage = TokenUsage {
            input_tokens: response.usage.prompt_tokens,
            output_tokens: response.usage.completion_tokens,
        };
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LeadgateError::provider("OpenAI response contained no choices"))?;

        Ok(ProviderResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            stop_reason: choice.finish_reason,
            usage,
        })
    }
}

fn resolve_api_key(
    config_key: Option<&str>,
    env_key: Option<String>,
) -> Result<String, LeadgateError> {
    config_key
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| env_key.filter(|k| !k.is_empty()))
        .ok_or_else(|| {
            LeadgateError::Config(format!(
                "OpenAI API key not found. Set openai.api_key in config or {API_KEY_ENV}."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_core::types::ProviderMessage;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_request(system: Option<&str>) -> ProviderRequest {
        ProviderRequest {
            model: "gpt-4o-mini".into(),
            system_prompt: system.map(str::to_string),
            messages: vec![ProviderMessage::user("prompt text")],
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    #[test]
    fn system_prompt_becomes_first_message() {
        let req = to_completion_request(&provider_request(Some("be terse")));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");

        let req = to_completion_request(&provider_request(None));
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn resolve_api_key_order() {
        assert_eq!(resolve_api_key(Some("a"), Some("b".into())).unwrap(), "a");
        assert_eq!(resolve_api_key(None, Some("b".into())).unwrap(), "b");
        assert!(resolve_api_key(Some(""), None).is_err());
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "prompt text"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-xyz",
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "```json\n{\"intent\": \"inquiry\"}\n```"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 30, "completion_tokens": 9, "total_tokens": 39}
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_client(OpenAiClient::new("k").unwrap().with_base_url(server.uri()));
        let resp = provider.complete(provider_request(None)).await.unwrap();
        assert_eq!(resp.id, "chatcmpl-xyz");
        assert!(resp.content.contains("\"inquiry\""));
        assert_eq!(resp.stop_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.output_tokens, 9);
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-empty",
                "model": "gpt-4o-mini",
                "choices": []
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::with_client(OpenAiClient::new("k").unwrap().with_base_url(server.uri()));
        let err = provider.complete(provider_request(None)).await.unwrap_err();
        assert!(matches!(err, LeadgateError::Provider { .. }));
    }
}
