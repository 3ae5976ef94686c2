// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateful lead qualification.
//!
//! Each inbound customer message is checked against a blacklist, classified by
//! a language model using a bounded window of recent turns, parsed tolerantly,
//! and fed through an off-topic counter that forces escalation to a human after
//! a streak of unrelated messages.
//!
//! # Components
//!
//! - [`Blacklist`] - normalized identifier deny-list
//! - [`ConversationMemory`] - bounded turn log
//! - [`parser`] - code-fence stripping and tolerant JSON decoding
//! - [`OffTopicCounter`] - consecutive off-topic state machine
//! - [`QualifierState`] - memory and counter update without I/O
//! - [`LeadQualifier`] - the per-message loop around a [`ProviderAdapter`]
//!
//! [`ProviderAdapter`]: leadgate_core::traits::ProviderAdapter

pub mod blacklist;
pub mod classification;
pub mod escalation;
pub mod memory;
pub mod parser;
pub mod prompt;
pub mod qualifier;
pub mod state;

pub use blacklist::{Blacklist, BlacklistVerdict};
pub use classification::{
    Action, ClassificationResult, Intent, LeadData, Priority, SchemaIssue, Tone,
};
pub use escalation::{CounterTransition, OffTopicCounter};
pub use memory::{ConversationMemory, Turn, TurnRole};
pub use parser::{ResponseFormatError, decode_response, parse_or_degrade, parse_response};
pub use prompt::{ClassificationRequest, PromptContext};
pub use qualifier::{LeadQualifier, QualifierConfig, QualifierStatus};
pub use state::QualifierState;
