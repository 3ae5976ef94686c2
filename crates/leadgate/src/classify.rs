// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadgate classify` command implementation.

use leadgate_core::LeadgateError;
use leadgate_qualifier::LeadQualifier;

/// Classifies one message and prints the result as pretty JSON on stdout.
pub async fn run_classify(
    mut qualifier: LeadQualifier,
    message: &str,
    identifier: Option<&str>,
) -> Result<(), LeadgateError> {
    let result = qualifier.process(message, identifier).await?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| LeadgateError::Internal(format!("failed to serialize result: {e}")))?;
    println!("{json}");
    Ok(())
}
