// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded conversation memory.
//!
//! Holds the most recent turns of a single conversation in insertion order.
//! Capacity is counted in turns; [`ConversationMemory::for_window`] converts a
//! round-trip window (one customer turn plus one system turn) into turns.

use std::collections::VecDeque;
use std::fmt;

/// Transcript returned by [`ConversationMemory::render`] when nothing is stored.
pub const NO_HISTORY: &str = "No prior history.";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    Customer,
    System,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::Customer => write!(f, "Customer"),
            TurnRole::System => write!(f, "System"),
        }
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: TurnRole,
    content: String,
}

impl Turn {
    pub fn customer(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Customer,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Fixed-capacity turn log with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ConversationMemory {
    /// Creates a memory holding at most `capacity` turns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a memory holding the last `pairs` customer/system round trips.
    pub fn for_window(pairs: usize) -> Self {
        Self::with_capacity(pairs.saturating_mul(2))
    }

    /// Appends a turn, evicting the oldest turns while over capacity.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Appends a customer message followed by the system's reply.
    pub fn record_exchange(&mut self, customer: impl Into<String>, system: impl Into<String>) {
        self.append(Turn::customer(customer));
        self.append(Turn::system(system));
    }

    /// Renders the surviving turns as a labeled transcript, oldest first.
    pub fn render(&self) -> String {
        if self.turns.is_empty() {
            return NO_HISTORY.to_string();
        }

        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}
