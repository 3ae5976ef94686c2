// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast tests of the qualification loop without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadgate_core::LeadgateError;
use leadgate_core::traits::adapter::PluginAdapter;
use leadgate_core::traits::provider::ProviderAdapter;
use leadgate_core::types::{ProviderRequest, ProviderResponse, TokenUsage};

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Completion text returned verbatim.
    Text(String),
    /// `complete` fails with `LeadgateError::Provider` carrying this message.
    Failure(String),
}

/// A mock LLM provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" text is returned. Every request is captured.
#[derive(Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given completion texts.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies = responses
            .into_iter()
            .map(|text| MockReply::Text(text.into()))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(MockReply::Text(text.into()));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(MockReply::Failure(message.into()));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Prompt text of the most recent request's last message.
    pub async fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .await
            .last()
            .and_then(|req| req.messages.last())
            .map(|msg| msg.content.clone())
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, LeadgateError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        match self.next_reply().await {
            MockReply::Text(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model,
                stop_reason: Some("end_turn".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            MockReply::Failure(message) => Err(LeadgateError::provider(message)),
        }
    }
}

/// Well-formed classification JSON for `intent` with the given off-topic flag.
///
/// The action is `continue` and the priority follows the flag.
pub fn classification_reply(intent: &str, is_off_topic: bool) -> String {
    serde_json::json!({
        "intent": intent,
        "data": {"name": null, "channel": "whatsapp", "tone": "neutral"},
        "is_off_topic": is_off_topic,
        "action": "continue",
        "priority": if is_off_topic { "low" } else { "medium" },
        "risk": null,
        "reasoning": format!("classified as {intent}"),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_core::types::ProviderMessage;

    fn req(prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            messages: vec![ProviderMessage::user(prompt)],
            max_tokens: 100,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(req("hi")).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_responses(["first", "second"]);
        provider.add_failure("HTTP 503").await;

        assert_eq!(provider.complete(req("a")).await.unwrap().content, "first");
        assert_eq!(provider.complete(req("b")).await.unwrap().content, "second");
        let err = provider.complete(req("c")).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
        assert_eq!(
            provider.complete(req("d")).await.unwrap().content,
            "mock response"
        );
    }

    #[tokio::test]
    async fn requests_are_captured() {
        let provider = MockProvider::new();
        provider.complete(req("first prompt")).await.unwrap();
        provider.complete(req("second prompt")).await.unwrap();

        assert_eq!(provider.call_count().await, 2);
        assert_eq!(provider.last_prompt().await.as_deref(), Some("second prompt"));
        assert_eq!(provider.requests().await[0].messages[0].content, "first prompt");
    }

    #[test]
    fn identity_through_trait_object() {
        let provider: Arc<dyn ProviderAdapter> = Arc::new(MockProvider::new());
        assert_eq!(provider.name(), "mock-provider");
        assert_eq!(provider.version(), semver::Version::new(0, 1, 0));
    }

    #[test]
    fn classification_reply_is_valid_json() {
        let value: serde_json::Value =
            serde_json::from_str(&classification_reply("off-topic", true)).unwrap();
        assert_eq!(value["intent"], "off-topic");
        assert_eq!(value["is_off_topic"], true);
        assert_eq!(value["action"], "continue");
    }
}
