// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider selection from configuration.

use std::sync::Arc;

use leadgate_config::{LeadgateConfig, ProviderKind};
use leadgate_core::LeadgateError;
use leadgate_core::traits::ProviderAdapter;
use tracing::info;

/// Builds the provider named by `model.provider`, resolving `auto` from the
/// model name.
pub fn build_provider(config: &LeadgateConfig) -> Result<Arc<dyn ProviderAdapter>, LeadgateError> {
    let kind = config.model.provider.resolve(&config.model.name);
    info!(provider = ?kind, model = %config.model.name, "selecting provider");

    let provider: Arc<dyn ProviderAdapter> = match kind {
        #[cfg(feature = "anthropic")]
        ProviderKind::Anthropic => Arc::new(leadgate_anthropic::AnthropicProvider::new(config)?),
        #[cfg(feature = "openai")]
        ProviderKind::OpenAi => Arc::new(leadgate_openai::OpenAiProvider::new(config)?),
        other => {
            return Err(LeadgateError::Config(format!(
                "provider {other:?} is not available in this build"
            )));
        }
    };
    info!(
        provider = provider.name(),
        version = %provider.version(),
        "provider ready"
    );
    Ok(provider)
}
