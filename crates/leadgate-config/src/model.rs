// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Leadgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadgateConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Classification model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Qualifier behavior: memory window, escalation threshold, business context.
    #[serde(default)]
    pub qualifier: QualifierSettings,

    /// Static deny-list of lead identifiers.
    #[serde(default)]
    pub blacklist: BlacklistConfig,
}

/// Every accepted key, by section, in file order.
pub const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("agent", &["name", "log_level"]),
    ("model", &["name", "temperature", "max_tokens", "provider"]),
    ("anthropic", &["api_key", "api_version", "base_url"]),
    ("openai", &["api_key", "base_url"]),
    (
        "qualifier",
        &["memory_window", "off_topic_threshold", "business", "channel"],
    ),
    ("blacklist", &["identifiers"]),
];

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "leadgate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which provider backend serves the classification model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic for model names containing "claude", OpenAI otherwise.
    #[default]
    Auto,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Resolves `Auto` against a model name. Explicit kinds are returned unchanged.
    pub fn resolve(self, model: &str) -> ProviderKind {
        match self {
            ProviderKind::Auto if model.to_lowercase().contains("claude") => {
                ProviderKind::Anthropic
            }
            ProviderKind::Auto => ProviderKind::OpenAi,
            explicit => explicit,
        }
    }
}

/// Classification model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Sampling temperature. Lower is more deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per classification.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Provider backend selection.
    #[serde(default)]
    pub provider: ProviderKind,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            provider: ProviderKind::default(),
        }
    }
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1024
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Messages endpoint URL.
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            base_url: default_anthropic_url(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions endpoint URL.
    #[serde(default = "default_openai_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_url(),
        }
    }
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

/// Qualifier behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QualifierSettings {
    /// Number of customer/system round trips kept in conversation memory.
    #[serde(default = "default_memory_window")]
    pub memory_window: usize,

    /// Consecutive off-topic messages that force escalation to a human.
    #[serde(default = "default_off_topic_threshold")]
    pub off_topic_threshold: u32,

    /// Business description injected into the classification prompt.
    #[serde(default = "default_business")]
    pub business: String,

    /// Channel reported in extracted lead data.
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl Default for QualifierSettings {
    fn default() -> Self {
        Self {
            memory_window: default_memory_window(),
            off_topic_threshold: default_off_topic_threshold(),
            business: default_business(),
            channel: default_channel(),
        }
    }
}

fn default_memory_window() -> usize {
    3
}

fn default_off_topic_threshold() -> u32 {
    3
}

fn default_business() -> String {
    "medical appointment management".to_string()
}

fn default_channel() -> String {
    "whatsapp".to_string()
}

/// Blacklist configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlacklistConfig {
    /// Blocked identifiers (phone numbers or user IDs). Whitespace and hyphens
    /// are ignored when matching.
    #[serde(default = "default_blacklist")]
    pub identifiers: Vec<String>,
}

/// Strips whitespace and hyphens: `"+34 600-123 456"` becomes `"+34600123456"`.
///
/// Blacklist entries and looked-up identifiers are compared in this form.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            identifiers: default_blacklist(),
        }
    }
}

fn default_blacklist() -> Vec<String> {
    vec![
        "123456789".to_string(),
        "999999999".to_string(),
        "spam_user".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_provider_picks_anthropic_for_claude_models() {
        assert_eq!(
            ProviderKind::Auto.resolve("claude-sonnet-4-20250514"),
            ProviderKind::Anthropic
        );
        assert_eq!(
            ProviderKind::Auto.resolve("Claude-3-Haiku"),
            ProviderKind::Anthropic
        );
        assert_eq!(ProviderKind::Auto.resolve("gpt-4o-mini"), ProviderKind::OpenAi);
    }

    #[test]
    fn explicit_provider_is_not_overridden() {
        assert_eq!(
            ProviderKind::OpenAi.resolve("claude-proxy-model"),
            ProviderKind::OpenAi
        );
        assert_eq!(
            ProviderKind::Anthropic.resolve("gpt-4o"),
            ProviderKind::Anthropic
        );
    }

    #[test]
    fn provider_kind_deserializes_lowercase() {
        let cfg: ModelConfig = toml::from_str("provider = \"openai\"").unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAi);
        let cfg: ModelConfig = toml::from_str("provider = \"anthropic\"").unwrap();
        assert_eq!(cfg.provider, ProviderKind::Anthropic);
    }

    #[test]
    fn known_keys_match_serialized_layout() {
        let mut config = LeadgateConfig::default();
        config.anthropic.api_key = Some("sk-ant".to_string());
        config.openai.api_key = Some("sk".to_string());
        let value = toml::Value::try_from(&config).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.len(), KNOWN_KEYS.len());

        for (section, keys) in KNOWN_KEYS {
            let mut actual: Vec<&str> = table[*section]
                .as_table()
                .unwrap()
                .keys()
                .map(String::as_str)
                .collect();
            let mut expected = keys.to_vec();
            actual.sort_unstable();
            expected.sort_unstable();
            assert_eq!(actual, expected, "section [{section}]");
        }
    }

    #[test]
    fn default_blacklist_matches_seed_identifiers() {
        let cfg = BlacklistConfig::default();
        assert_eq!(cfg.identifiers, vec!["123456789", "999999999", "spam_user"]);
    }
}
