// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification prompt template.

use std::fmt::Write as _;

/// Per-message inputs to the classification prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub message: String,
    /// Rendered conversation memory.
    pub history: String,
    pub off_topic_count: u32,
}

/// Deployment-level inputs that stay fixed for a qualifier instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub business: String,
    pub channel: String,
    pub threshold: u32,
}

impl ClassificationRequest {
    pub fn new(message: impl Into<String>, history: impl Into<String>, off_topic_count: u32) -> Self {
        Self {
            message: message.into(),
            history: history.into(),
            off_topic_count,
        }
    }

    /// Renders the full prompt text sent to the model as a single user message.
    pub fn render(&self, ctx: &PromptContext) -> String {
        let mut out = String::with_capacity(2048);

        let _ = writeln!(
            out,
            "You are the first filter of a sales conversation. Decide whether the lead has a \
             real interest in our {} service.",
            ctx.business
        );
        out.push_str(
            "\nYour job:\n\
             1. Read the customer's message.\n\
             2. Classify the intent: inquiry, booking, objection, cancellation, spam, off-topic.\n\
             3. Extract the customer's name if mentioned, and their tone (frustrated, neutral, positive).\n\
             4. Detect red flags: spam, bots, offensive language.\n",
        );
        let _ = write!(
            out,
            "\nEscalation rule:\n\
             - If the lead writes {} messages in a row unrelated to the business, product or \
             service, mark the conversation for escalation to a human sales agent.\n\
             - Off-topic examples: jokes, personal messages, random topics, casual chat with no \
             commercial intent.\n",
            ctx.threshold
        );
        let _ = write!(
            out,
            "\nAlways answer with valid JSON using exactly this structure:\n\
             {{\n  \
             \"intent\": \"inquiry\" | \"booking\" | \"objection\" | \"cancellation\" | \"spam\" | \"off-topic\",\n  \
             \"data\": {{\n    \
             \"name\": \"customer name or null\",\n    \
             \"channel\": \"{}\",\n    \
             \"tone\": \"frustrated\" | \"neutral\" | \"positive\"\n  \
             }},\n  \
             \"is_off_topic\": true | false,\n  \
             \"action\": \"continue\" | \"escalate_human\",\n  \
             \"priority\": \"low\" | \"medium\" | \"high\",\n  \
             \"risk\": \"risk description or null\",\n  \
             \"reasoning\": \"short explanation of your decision\"\n\
             }}\n",
            ctx.channel
        );
        let _ = write!(
            out,
            "\nCurrent customer message: {}\n\
             \nPrevious interactions:\n{}\n\
             \nOff-topic messages so far: {}\n\
             \nRespond ONLY with the JSON, no additional text.",
            self.message, self.history, self.off_topic_count
        );
        out
    }
}
