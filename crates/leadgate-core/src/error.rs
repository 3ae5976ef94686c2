// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadgate lead qualifier.

use thiserror::Error;

/// The primary error type used across provider adapters and the qualifier.
///
/// Malformed model output is deliberately absent: the qualifier recovers from
/// it locally and never surfaces it through this type.
#[derive(Debug, Error)]
pub enum LeadgateError {
    /// Configuration errors (missing API key, invalid header values, bad settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider errors (network failure, authentication, non-success status).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeadgateError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
