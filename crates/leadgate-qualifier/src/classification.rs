// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed classification result and its JSON wire schema.
//!
//! Field and value names are English snake_case. The Spanish names emitted by
//! older prompt revisions (`intencion`, `accion`, `consulta`, ...) are accepted
//! as aliases when decoding. Unexpected enum strings decode to `Unknown`
//! instead of failing the whole payload, and model output is read field by
//! field through [`ClassificationResult::from_json_object`] so one badly typed
//! field cannot discard the rest.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum::Display;

/// Reasoning attached to the blacklist short-circuit result.
pub const BLACKLISTED_REASONING: &str = "blacklisted user";

/// Reasoning attached to the degraded result produced on a decode failure.
pub const FORMAT_ERROR_REASONING: &str = "response format error";

/// What the customer is trying to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    #[serde(alias = "consulta")]
    Inquiry,
    #[serde(alias = "reserva")]
    Booking,
    #[serde(alias = "objecion", alias = "objeción")]
    Objection,
    #[serde(alias = "cancelacion", alias = "cancelación")]
    Cancellation,
    Spam,
    #[serde(rename = "off-topic", alias = "off_topic")]
    #[strum(serialize = "off-topic")]
    OffTopic,
    /// Degraded result: the model response could not be decoded.
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Intent {
    /// True for intents that count against the off-topic streak.
    pub fn is_off_topic_like(self) -> bool {
        matches!(self, Intent::OffTopic | Intent::Spam)
    }
}

/// What the pipeline should do with the conversation next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    #[serde(alias = "continuar")]
    Continue,
    #[serde(alias = "escalar_humano")]
    EscalateHuman,
    #[serde(alias = "bloquear")]
    Block,
    /// Degraded result: the model response could not be decoded.
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "baja")]
    Low,
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "alta")]
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    #[serde(alias = "frustrado")]
    Frustrated,
    Neutral,
    #[serde(alias = "positivo")]
    Positive,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Lead metadata extracted from the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadData {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "canal", deserialize_with = "null_as_default")]
    pub channel: String,
    #[serde(default, alias = "tono", deserialize_with = "null_as_default")]
    pub tone: Tone,
}

/// Structured output of one classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default, alias = "intencion", deserialize_with = "null_as_default")]
    pub intent: Intent,
    #[serde(default, alias = "datos", deserialize_with = "null_as_default")]
    pub data: LeadData,
    #[serde(default, alias = "es_off_topic", deserialize_with = "null_as_default")]
    pub is_off_topic: bool,
    #[serde(default, alias = "accion", deserialize_with = "null_as_default")]
    pub action: Action,
    #[serde(default, alias = "prioridad", deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, alias = "riesgo")]
    pub risk: Option<String>,
    #[serde(default, alias = "razonamiento", deserialize_with = "null_as_default")]
    pub reasoning: String,
    /// Set only by the blacklist short-circuit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}

impl ClassificationResult {
    /// Result returned for a blacklisted identifier without consulting the model.
    pub fn blacklisted() -> Self {
        Self {
            intent: Intent::Spam,
            action: Action::Block,
            reasoning: BLACKLISTED_REASONING.to_string(),
            blocked: true,
            ..Self::default()
        }
    }

    /// Degraded result used when the model response cannot be decoded.
    pub fn format_error() -> Self {
        Self {
            intent: Intent::Error,
            action: Action::Error,
            reasoning: FORMAT_ERROR_REASONING.to_string(),
            ..Self::default()
        }
    }

    /// True when this is the degraded decode-failure result.
    pub fn is_degraded(&self) -> bool {
        self.intent == Intent::Error && self.action == Action::Error
    }

    /// Decodes a result from a JSON object one field at a time.
    ///
    /// English names win over their Spanish aliases. `null` and missing fields
    /// take the default silently. A field holding the wrong JSON type takes the
    /// default and is reported as [`SchemaIssue::MalformedField`]. The flag
    /// also accepts the strings `"true"` and `"false"`. `blocked` is never
    /// read from model output.
    pub fn from_json_object(object: &Map<String, Value>) -> (Self, Vec<SchemaIssue>) {
        let mut issues = Vec::new();

        let data = match field(object, "data", "datos") {
            None => LeadData::default(),
            Some(Value::Object(inner)) => LeadData {
                name: lenient(field(inner, "name", "nombre"), "data.name", &mut issues),
                channel: lenient(field(inner, "channel", "canal"), "data.channel", &mut issues),
                tone: lenient(field(inner, "tone", "tono"), "data.tone", &mut issues),
            },
            Some(_) => {
                issues.push(SchemaIssue::MalformedField("data"));
                LeadData::default()
            }
        };

        let result = Self {
            intent: lenient(field(object, "intent", "intencion"), "intent", &mut issues),
            data,
            is_off_topic: lenient_flag(
                field(object, "is_off_topic", "es_off_topic"),
                "is_off_topic",
                &mut issues,
            ),
            action: lenient(field(object, "action", "accion"), "action", &mut issues),
            priority: lenient(field(object, "priority", "prioridad"), "priority", &mut issues),
            risk: lenient(field(object, "risk", "riesgo"), "risk", &mut issues),
            reasoning: lenient(
                field(object, "reasoning", "razonamiento"),
                "reasoning",
                &mut issues,
            ),
            blocked: false,
        };

        (result.normalized(), issues)
    }

    /// Treats the literal strings `"null"`, `"none"` and blanks in optional
    /// text fields as absent; models sometimes echo the schema placeholder.
    pub fn normalized(mut self) -> Self {
        self.data.name = self.data.name.and_then(non_placeholder);
        self.risk = self.risk.and_then(non_placeholder);
        self
    }

    /// Reports fields that decoded but violate the expected schema.
    pub fn validate(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        if self.intent == Intent::Unknown {
            issues.push(SchemaIssue::UnknownIntent);
        }
        if self.action == Action::Unknown {
            issues.push(SchemaIssue::UnknownAction);
        }
        if self.priority == Priority::Unknown {
            issues.push(SchemaIssue::UnknownPriority);
        }
        if self.data.tone == Tone::Unknown {
            issues.push(SchemaIssue::UnknownTone);
        }
        if self.intent.is_off_topic_like() && !self.is_off_topic {
            issues.push(SchemaIssue::OffTopicFlagMismatch);
        }
        issues
    }
}

/// A schema violation found while decoding or by [`ClassificationResult::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaIssue {
    UnknownIntent,
    UnknownAction,
    UnknownPriority,
    UnknownTone,
    /// Intent is off-topic or spam while `is_off_topic` is false.
    OffTopicFlagMismatch,
    /// The named field had the wrong JSON type and was replaced by its default.
    MalformedField(&'static str),
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::UnknownIntent => f.write_str("unknown_intent"),
            SchemaIssue::UnknownAction => f.write_str("unknown_action"),
            SchemaIssue::UnknownPriority => f.write_str("unknown_priority"),
            SchemaIssue::UnknownTone => f.write_str("unknown_tone"),
            SchemaIssue::OffTopicFlagMismatch => f.write_str("off_topic_flag_mismatch"),
            SchemaIssue::MalformedField(name) => write!(f, "malformed_field({name})"),
        }
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    object
        .get(name)
        .or_else(|| object.get(alias))
        .filter(|value| !value.is_null())
}

fn lenient<T>(value: Option<&Value>, name: &'static str, issues: &mut Vec<SchemaIssue>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = value else {
        return T::default();
    };
    T::deserialize(value).unwrap_or_else(|_| {
        issues.push(SchemaIssue::MalformedField(name));
        T::default()
    })
}

fn lenient_flag(value: Option<&Value>, name: &'static str, issues: &mut Vec<SchemaIssue>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) if text.trim().eq_ignore_ascii_case("true") => true,
        Some(Value::String(text)) if text.trim().eq_ignore_ascii_case("false") => false,
        Some(_) => {
            issues.push(SchemaIssue::MalformedField(name));
            false
        }
    }
}

fn non_placeholder(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
    {
        None
    } else {
        Some(value)
    }
}

/// Deserializes JSON `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
