// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state and its pure transition.
//!
//! [`QualifierState`] owns the conversation memory and the off-topic counter.
//! Building a request and recording a classification are separate steps so the
//! state machine can be driven without a model.

use tracing::warn;

use crate::classification::ClassificationResult;
use crate::escalation::{CounterTransition, OffTopicCounter};
use crate::memory::ConversationMemory;
use crate::prompt::ClassificationRequest;

#[derive(Debug, Clone)]
pub struct QualifierState {
    memory: ConversationMemory,
    counter: OffTopicCounter,
}

impl QualifierState {
    /// Creates empty state keeping `memory_window` round trips.
    pub fn new(memory_window: usize, off_topic_threshold: u32) -> Self {
        Self {
            memory: ConversationMemory::for_window(memory_window),
            counter: OffTopicCounter::new(off_topic_threshold),
        }
    }

    /// Snapshot of the current history and counter for `message`.
    pub fn request(&self, message: &str) -> ClassificationRequest {
        ClassificationRequest::new(message, self.memory.render(), self.counter.count())
    }

    /// Applies the counter transition to `result` and appends the exchange to
    /// memory. Returns the final result and the transition taken.
    pub fn record(
        &mut self,
        message: &str,
        mut result: ClassificationResult,
    ) -> (ClassificationResult, CounterTransition) {
        let transition = self.counter.apply(&mut result);
        let reply = match serde_json::to_string(&result) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize classification for memory");
                result.reasoning.clone()
            }
        };
        self.memory.record_exchange(message, reply);
        (result, transition)
    }

    pub fn reset(&mut self) {
        self.memory.clear();
        self.counter.reset();
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn counter(&self) -> &OffTopicCounter {
        &self.counter
    }
}
