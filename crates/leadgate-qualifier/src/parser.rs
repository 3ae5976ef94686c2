// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant decoding of model output into a [`ClassificationResult`].
//!
//! Models are asked for bare JSON but frequently wrap it in a Markdown code
//! fence. The fence is stripped before decoding. Decode failures are recovered
//! into [`ClassificationResult::format_error`] by [`parse_or_degrade`], which
//! logs the raw text so the failure can be diagnosed.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classification::{ClassificationResult, SchemaIssue};

/// Structural decode failure on model output.
#[derive(Debug, Error)]
pub enum ResponseFormatError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The text is JSON but not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Removes a leading ```` ```json ```` or ```` ``` ```` marker and a trailing
/// ```` ``` ```` marker, then trims surrounding whitespace.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Decodes model output into a classification along with every schema issue
/// found on the way.
pub fn decode_response(
    raw: &str,
) -> Result<(ClassificationResult, Vec<SchemaIssue>), ResponseFormatError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(object) = &value else {
        return Err(ResponseFormatError::NotAnObject {
            found: json_kind(&value),
        });
    };
    let (result, mut issues) = ClassificationResult::from_json_object(object);
    issues.extend(result.validate());
    Ok((result, issues))
}

/// Decodes model output into a classification, or reports why it could not.
pub fn parse_response(raw: &str) -> Result<ClassificationResult, ResponseFormatError> {
    decode_response(raw).map(|(result, _)| result)
}

/// Decodes model output, substituting the degraded result on failure.
///
/// Never fails. Decode failures and schema violations are logged at `warn`
/// with the raw response attached.
pub fn parse_or_degrade(raw: &str) -> ClassificationResult {
    match decode_response(raw) {
        Ok((result, issues)) => {
            if issues.is_empty() {
                debug!(intent = %result.intent, action = %result.action, "classification parsed");
            } else {
                let issues = issues
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(issues = %issues, raw = %raw, "classification decoded with schema issues");
            }
            result
        }
        Err(e) => {
            warn!(error = %e, raw = %raw, "failed to parse classification response");
            ClassificationResult::format_error()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
