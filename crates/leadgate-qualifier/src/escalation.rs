// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consecutive off-topic counter.
//!
//! The counter increments on every classification flagged `is_off_topic`,
//! resets on a classification that is neither flagged nor has an off-topic or
//! spam intent, and holds its value when the model contradicts itself (intent
//! off-topic or spam with the flag unset). Reaching the threshold does not
//! stop counting; only a reset or an on-topic message clears it.

use tracing::{debug, info, warn};

use crate::classification::{Action, ClassificationResult};

/// Default number of consecutive off-topic messages that trips escalation.
pub const DEFAULT_THRESHOLD: u32 = 3;

/// What a single observation did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTransition {
    /// Counter went up; `tripped` is set when `count >= threshold`.
    Incremented { count: u32, tripped: bool },
    /// Counter was cleared from `previous`.
    Reset { previous: u32 },
    /// Inconsistent classification; counter unchanged.
    Held { count: u32 },
}

impl CounterTransition {
    pub fn tripped(self) -> bool {
        matches!(self, CounterTransition::Incremented { tripped: true, .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffTopicCounter {
    count: u32,
    threshold: u32,
}

impl Default for OffTopicCounter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl OffTopicCounter {
    /// Creates a counter at zero. A threshold of zero is treated as one.
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Feeds one classification through the state machine.
    pub fn observe(&mut self, result: &ClassificationResult) -> CounterTransition {
        if result.is_off_topic {
            self.count = self.count.saturating_add(1);
            let tripped = self.count >= self.threshold;
            if tripped {
                warn!(count = self.count, threshold = self.threshold, "off-topic threshold reached");
            } else {
                debug!(count = self.count, "off-topic counter incremented");
            }
            CounterTransition::Incremented {
                count: self.count,
                tripped,
            }
        } else if result.intent.is_off_topic_like() {
            warn!(
                intent = %result.intent,
                count = self.count,
                "off-topic intent without off-topic flag; counter held"
            );
            CounterTransition::Held { count: self.count }
        } else {
            let previous = self.count;
            self.count = 0;
            if previous > 0 {
                debug!(previous, "off-topic counter reset");
            }
            CounterTransition::Reset { previous }
        }
    }

    /// Observes `result` and, when the threshold trips, forces escalation.
    pub fn apply(&mut self, result: &mut ClassificationResult) -> CounterTransition {
        let transition = self.observe(result);
        if transition.tripped() {
            result.action = Action::EscalateHuman;
            let note = escalation_note(self.threshold);
            if result.reasoning.trim().is_empty() {
                result.reasoning = note;
            } else {
                result.reasoning.push_str(" | ");
                result.reasoning.push_str(&note);
            }
        }
        transition
    }

    pub fn reset(&mut self) {
        if self.count > 0 {
            info!(previous = self.count, "off-topic counter cleared");
        }
        self.count = 0;
    }
}

/// Annotation appended to `reasoning` when escalation is forced.
pub fn escalation_note(threshold: u32) -> String {
    format!("{threshold} consecutive off-topic messages detected")
}
