// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as temperature ranges and non-zero window sizes.

use crate::diagnostic::ConfigError;
use crate::model::{LeadgateConfig, normalize_identifier};

/// Upper bound accepted by both supported providers.
const MAX_TEMPERATURE: f32 = 2.0;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.model.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "model.name must not be empty".to_string(),
        });
    }

    let temperature = config.model.temperature;
    if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "model.temperature must be between 0.0 and {MAX_TEMPERATURE}, got {temperature}"
            ),
        });
    }

    if config.model.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "model.max_tokens must be at least 1".to_string(),
        });
    }

    if config.qualifier.memory_window == 0 {
        errors.push(ConfigError::Validation {
            message: "qualifier.memory_window must be at least 1".to_string(),
        });
    }

    if config.qualifier.off_topic_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "qualifier.off_topic_threshold must be at least 1".to_string(),
        });
    }

    for (i, identifier) in config.blacklist.identifiers.iter().enumerate() {
        if normalize_identifier(identifier).is_empty() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "blacklist.identifiers[{i}] must contain more than whitespace and hyphens, got {identifier:?}"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_validation_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = LeadgateConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = LeadgateConfig::default();
        config.model.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "model.temperature"));
    }

    #[test]
    fn zero_memory_window_fails_validation() {
        let mut config = LeadgateConfig::default();
        config.qualifier.memory_window = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "memory_window"));
    }

    #[test]
    fn zero_threshold_fails_validation() {
        let mut config = LeadgateConfig::default();
        config.qualifier.off_topic_threshold = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "off_topic_threshold"));
    }

    #[test]
    fn collects_every_error_instead_of_failing_fast() {
        let mut config = LeadgateConfig::default();
        config.model.name = "  ".to_string();
        config.model.max_tokens = 0;
        config.blacklist.identifiers.push(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_validation_error(&errors, "blacklist.identifiers[3]"));
    }

    #[test]
    fn separator_only_blacklist_entries_fail_validation() {
        let mut config = LeadgateConfig::default();
        config.blacklist.identifiers = vec![
            "--".to_string(),
            " - ".to_string(),
            "+34 600-123 456".to_string(),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_validation_error(&errors, "blacklist.identifiers[0]"));
        assert!(has_validation_error(&errors, "blacklist.identifiers[1]"));
    }
}
