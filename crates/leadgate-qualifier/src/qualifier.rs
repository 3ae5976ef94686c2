// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message qualification loop.
//!
//! [`LeadQualifier`] owns one conversation's state and drives it through the
//! blacklist check, the model call, tolerant parsing and the state update.
//! Calls for one conversation must be serialized; `process` takes `&mut self`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use leadgate_config::model::LeadgateConfig;
use leadgate_core::LeadgateError;
use leadgate_core::traits::ProviderAdapter;
use leadgate_core::types::{ProviderMessage, ProviderRequest};

use crate::blacklist::Blacklist;
use crate::classification::ClassificationResult;
use crate::escalation::DEFAULT_THRESHOLD;
use crate::memory::ConversationMemory;
use crate::parser::parse_or_degrade;
use crate::prompt::PromptContext;
use crate::state::QualifierState;

/// Construction-time settings for a [`LeadQualifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualifierConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Round trips kept in memory.
    pub memory_window: usize,
    pub off_topic_threshold: u32,
    pub business: String,
    pub channel: String,
}

impl Default for QualifierConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
            memory_window: 3,
            off_topic_threshold: DEFAULT_THRESHOLD,
            business: "medical appointment management".to_string(),
            channel: "whatsapp".to_string(),
        }
    }
}

impl From<&LeadgateConfig> for QualifierConfig {
    fn from(config: &LeadgateConfig) -> Self {
        Self {
            model: config.model.name.clone(),
            temperature: config.model.temperature,
            max_tokens: config.model.max_tokens,
            memory_window: config.qualifier.memory_window,
            off_topic_threshold: config.qualifier.off_topic_threshold,
            business: config.qualifier.business.clone(),
            channel: config.qualifier.channel.clone(),
        }
    }
}

/// Read-only view of a qualifier's session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualifierStatus {
    pub off_topic_count: u32,
    pub threshold: u32,
    pub memory_turns: usize,
    pub memory_capacity: usize,
}

/// Classifies inbound messages for a single conversation.
pub struct LeadQualifier {
    provider: Arc<dyn ProviderAdapter>,
    blacklist: Blacklist,
    config: QualifierConfig,
    prompt: PromptContext,
    state: QualifierState,
}

impl LeadQualifier {
    pub fn new(provider: Arc<dyn ProviderAdapter>, blacklist: Blacklist, config: QualifierConfig) -> Self {
        let state = QualifierState::new(config.memory_window, config.off_topic_threshold);
        let prompt = PromptContext {
            business: config.business.clone(),
            channel: config.channel.clone(),
            threshold: state.counter().threshold(),
        };
        Self {
            provider,
            blacklist,
            config,
            prompt,
            state,
        }
    }

    /// Builds a qualifier from loaded application configuration.
    pub fn from_config(provider: Arc<dyn ProviderAdapter>, config: &LeadgateConfig) -> Self {
        Self::new(
            provider,
            Blacklist::from(&config.blacklist),
            QualifierConfig::from(config),
        )
    }

    /// Classifies one message.
    ///
    /// A blacklisted `identifier` returns a block result without calling the
    /// model or touching session state. Undecodable model output becomes the
    /// degraded `error` result. Provider failures are returned as errors and
    /// leave state unchanged. The identifier itself is never logged.
    #[instrument(skip_all, fields(has_identifier = identifier.is_some()))]
    pub async fn process(
        &mut self,
        message: &str,
        identifier: Option<&str>,
    ) -> Result<ClassificationResult, LeadgateError> {
        if let Some(id) = identifier {
            if self.blacklist.check(id).is_blocked() {
                debug!("blacklisted sender, skipping classification");
                return Ok(ClassificationResult::blacklisted());
            }
        }

        let prompt = self.state.request(message).render(&self.prompt);
        let request = ProviderRequest {
            model: self.config.model.clone(),
            system_prompt: None,
            messages: vec![ProviderMessage::user(prompt)],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self.provider.complete(request).await?;
        debug!(
            provider = self.provider.name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model responded"
        );

        let parsed = parse_or_degrade(&response.content);
        let (result, _) = self.state.record(message, parsed);
        info!(
            intent = %result.intent,
            action = %result.action,
            off_topic_count = self.state.counter().count(),
            "message classified"
        );
        Ok(result)
    }

    /// Clears memory and the off-topic counter.
    pub fn reset(&mut self) {
        self.state.reset();
        info!("conversation state reset");
    }

    pub fn status(&self) -> QualifierStatus {
        let memory = self.state.memory();
        QualifierStatus {
            off_topic_count: self.state.counter().count(),
            threshold: self.state.counter().threshold(),
            memory_turns: memory.len(),
            memory_capacity: memory.capacity(),
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        self.state.memory()
    }

    pub fn config(&self) -> &QualifierConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{Action, Intent};
    use leadgate_test_utils::{MockProvider, classification_reply};
    use tracing_test::traced_test;

    fn qualifier(provider: &Arc<MockProvider>) -> LeadQualifier {
        LeadQualifier::new(
            provider.clone(),
            Blacklist::new(["123456789", "spam_user"]),
            QualifierConfig::default(),
        )
    }

    #[tokio::test]
    async fn blacklisted_identifier_short_circuits() {
        let provider = Arc::new(MockProvider::new());
        let mut q = qualifier(&provider);

        let result = q.process("hello", Some("123-456 789")).await.unwrap();
        assert_eq!(result.intent, Intent::Spam);
        assert_eq!(result.action, Action::Block);
        assert_eq!(result.reasoning, "blacklisted user");
        assert!(result.blocked);
        assert_eq!(provider.call_count().await, 0);
        assert_eq!(q.status().memory_turns, 0);
        assert_eq!(q.status().off_topic_count, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn sender_identifiers_stay_out_of_logs() {
        let provider = Arc::new(MockProvider::with_responses([classification_reply(
            "inquiry", false,
        )]));
        let mut q = qualifier(&provider);

        q.process("hello", Some("123-456 789")).await.unwrap();
        q.process("do you open on saturday?", Some("+34 600 111 222"))
            .await
            .unwrap();

        assert!(logs_contain("blacklisted sender, skipping classification"));
        assert!(logs_contain("message classified"));
        assert!(!logs_contain("123-456 789"));
        assert!(!logs_contain("123456789"));
        assert!(!logs_contain("600 111 222"));
        assert!(!logs_contain("+34600111222"));
    }

    #[tokio::test]
    async fn blacklist_does_not_touch_existing_state() {
        let provider = Arc::new(MockProvider::with_responses([classification_reply(
            "off-topic",
            true,
        )]));
        let mut q = qualifier(&provider);
        q.process("tell me a joke", Some("555")).await.unwrap();
        let before = q.status();

        q.process("buy now!!!", Some("spam_user")).await.unwrap();
        assert_eq!(q.status(), before);
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn third_off_topic_message_escalates() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            classification_reply("off-topic", true);
            3
        ]));
        let mut q = qualifier(&provider);

        let first = q.process("joke 1", None).await.unwrap();
        let second = q.process("joke 2", None).await.unwrap();
        let third = q.process("joke 3", None).await.unwrap();

        assert_eq!(first.action, Action::Continue);
        assert_eq!(second.action, Action::Continue);
        assert_eq!(third.action, Action::EscalateHuman);
        assert!(third.reasoning.contains("3 consecutive off-topic messages detected"));
        assert_eq!(q.status().off_topic_count, 3);
    }

    #[tokio::test]
    async fn on_topic_message_resets_counter() {
        let provider = Arc::new(MockProvider::with_responses([
            classification_reply("off-topic", true),
            classification_reply("off-topic", true),
            classification_reply("booking", false),
        ]));
        let mut q = qualifier(&provider);
        q.process("a", None).await.unwrap();
        q.process("b", None).await.unwrap();
        assert_eq!(q.status().off_topic_count, 2);

        q.process("I want an appointment on Monday", None).await.unwrap();
        assert_eq!(q.status().off_topic_count, 0);
    }

    #[tokio::test]
    async fn prompt_carries_history_and_counter() {
        let provider = Arc::new(MockProvider::with_responses([classification_reply(
            "off-topic",
            true,
        )]));
        let mut q = qualifier(&provider);
        q.process("what's the weather", None).await.unwrap();
        q.process("hello?", None).await.unwrap();

        let prompt = provider.last_prompt().await.unwrap();
        assert!(prompt.contains("Current customer message: hello?"));
        assert!(prompt.contains("Customer: what's the weather"));
        assert!(prompt.contains("Off-topic messages so far: 1"));

        let requests = provider.requests().await;
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert!((requests[0].temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_and_is_remembered() {
        let provider = Arc::new(MockProvider::with_responses(["Sure! Here is my answer."]));
        let mut q = qualifier(&provider);

        let result = q.process("hi", None).await.unwrap();
        assert!(result.is_degraded());
        assert_eq!(q.status().memory_turns, 2);
    }

    #[tokio::test]
    async fn provider_failure_propagates_without_state_change() {
        let provider = Arc::new(MockProvider::new());
        provider.add_failure("HTTP 401: invalid x-api-key").await;
        let mut q = qualifier(&provider);

        let err = q.process("hi", None).await.unwrap_err();
        assert!(matches!(err, LeadgateError::Provider { .. }));
        assert_eq!(q.status().memory_turns, 0);
    }

    #[tokio::test]
    async fn reset_twice_equals_reset_once() {
        let provider = Arc::new(MockProvider::with_responses([classification_reply(
            "off-topic",
            true,
        )]));
        let mut q = qualifier(&provider);
        q.process("joke", None).await.unwrap();

        q.reset();
        let once = q.status();
        q.reset();
        assert_eq!(q.status(), once);
        assert_eq!(once.off_topic_count, 0);
        assert_eq!(once.memory_turns, 0);
        assert!(q.memory().is_empty());
    }

    #[test]
    fn status_reports_capacity_in_turns() {
        let provider = Arc::new(MockProvider::new());
        let q = qualifier(&provider);
        let status = q.status();
        assert_eq!(status.memory_capacity, 6);
        assert_eq!(status.threshold, 3);
    }

    #[test]
    fn config_from_application_config() {
        let app = LeadgateConfig::default();
        let config = QualifierConfig::from(&app);
        assert_eq!(config, QualifierConfig::default());
    }
}
