// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration errors as miette diagnostics.
//!
//! Unknown keys are checked against [`KNOWN_KEYS`]. A key that exists in a
//! different section is pointed at that section; otherwise the closest key by
//! Jaro-Winkler similarity is suggested. Help text names the matching
//! `LEADGATE_*` environment variable, since either source can carry the value.

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::model::KNOWN_KEYS;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Prefix shared by every environment override.
const ENV_PREFIX: &str = "LEADGATE_";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section accepts at that position.
    #[error("unknown configuration key `{path}`")]
    #[diagnostic(
        code(leadgate::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted path of the rejected key, e.g. `qualifier.memory_windw`.
        path: String,
        /// Dotted path the key most likely meant.
        suggestion: Option<String>,
        /// Keys accepted where the unknown key was found.
        valid_keys: String,
    },

    /// A value of the wrong type, or a string outside an enumerated set.
    #[error("invalid value for `{path}`: found {found}, expected {expected}")]
    #[diagnostic(
        code(leadgate::config::invalid_value),
        help("fix `{path}` in leadgate.toml or the {env_var} environment variable")
    )]
    InvalidValue {
        path: String,
        found: String,
        expected: String,
        env_var: String,
    },

    /// A value that parsed but breaks a semantic rule.
    #[error("validation error: {message}")]
    #[diagnostic(code(leadgate::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(leadgate::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(path) => format!(
            "did you mean `{path}` ({})? Accepted here: {valid_keys}",
            env_var_for(path)
        ),
        None => format!("accepted here: {valid_keys}"),
    }
}

/// Environment variable that overrides the dotted config `path`.
///
/// `qualifier.memory_window` becomes `LEADGATE_QUALIFIER_MEMORY_WINDOW`.
pub fn env_var_for(path: &str) -> String {
    format!("{ENV_PREFIX}{}", path.replace('.', "_").to_ascii_uppercase())
}

/// Converts a `figment::Error` chain into one diagnostic per failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    let errors: Vec<ConfigError> = err
        .into_iter()
        .map(|error| {
            let section = error.path.first().map(String::as_str);
            match &error.kind {
                Kind::UnknownField(field, _) => unknown_key(section, field),
                Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
                    invalid_value(&error.path, actual.to_string(), expected.clone())
                }
                Kind::UnknownVariant(variant, expected) => invalid_value(
                    &error.path,
                    format!("`{variant}`"),
                    format!("one of {}", expected.join(", ")),
                ),
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect();

    debug!(count = errors.len(), "configuration rejected");
    errors
}

fn unknown_key(section: Option<&str>, key: &str) -> ConfigError {
    let accepted: Vec<&str> = match section.and_then(section_keys) {
        Some(keys) => keys.to_vec(),
        None => KNOWN_KEYS.iter().map(|(name, _)| *name).collect(),
    };
    let path = match section {
        Some(section) => format!("{section}.{key}"),
        None => key.to_string(),
    };
    ConfigError::UnknownKey {
        path,
        suggestion: suggest_path(section, key),
        valid_keys: accepted.join(", "),
    }
}

fn invalid_value(path: &[String], found: String, expected: String) -> ConfigError {
    let path = path.join(".");
    ConfigError::InvalidValue {
        env_var: env_var_for(&path),
        path,
        found,
        expected,
    }
}

fn section_keys(section: &str) -> Option<&'static [&'static str]> {
    KNOWN_KEYS
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, keys)| *keys)
}

/// Suggests the dotted path an unknown `key` most likely meant.
///
/// `section` is where the key was found, `None` for the top level. An exact
/// key from another section wins, then the closest key in the same section,
/// then (at the top level) the closest section name, then the closest key
/// anywhere.
pub fn suggest_path(section: Option<&str>, key: &str) -> Option<String> {
    if let Some(owner) = KNOWN_KEYS
        .iter()
        .find(|(name, keys)| Some(*name) != section && keys.contains(&key))
    {
        return Some(format!("{}.{key}", owner.0));
    }

    match section {
        Some(section) => {
            if let Some(best) = section_keys(section).and_then(|keys| suggest_key(key, keys)) {
                return Some(format!("{section}.{best}"));
            }
        }
        None => {
            let sections: Vec<&str> = KNOWN_KEYS.iter().map(|(name, _)| *name).collect();
            if let Some(best) = suggest_key(key, &sections) {
                return Some(best);
            }
        }
    }

    let mut best: Option<(f64, String)> = None;
    for (name, keys) in KNOWN_KEYS {
        for candidate in keys.iter() {
            let score = strsim::jaro_winkler(key, candidate);
            if score > best.as_ref().map_or(SUGGESTION_THRESHOLD, |(s, _)| *s) {
                best = Some((score, format!("{name}.{candidate}")));
            }
        }
    }
    best.map(|(_, path)| path)
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Renders each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::map_env_key;

    #[test]
    fn typo_is_matched_within_its_section() {
        assert_eq!(
            suggest_path(Some("qualifier"), "memory_windw").as_deref(),
            Some("qualifier.memory_window")
        );
        assert_eq!(
            suggest_path(Some("model"), "temprature").as_deref(),
            Some("model.temperature")
        );
    }

    #[test]
    fn misplaced_key_points_at_its_section() {
        assert_eq!(
            suggest_path(Some("qualifier"), "temperature").as_deref(),
            Some("model.temperature")
        );
        assert_eq!(
            suggest_path(Some("agent"), "identifiers").as_deref(),
            Some("blacklist.identifiers")
        );
        assert_eq!(
            suggest_path(None, "off_topic_threshold").as_deref(),
            Some("qualifier.off_topic_threshold")
        );
    }

    #[test]
    fn top_level_typo_suggests_a_section() {
        assert_eq!(suggest_path(None, "qualifer").as_deref(), Some("qualifier"));
        assert_eq!(suggest_path(None, "blacklsit").as_deref(), Some("blacklist"));
    }

    #[test]
    fn distant_key_gets_no_suggestion() {
        assert_eq!(suggest_path(Some("model"), "zzzzzz"), None);
        assert_eq!(suggest_path(None, "zzzzzz"), None);
    }

    #[test]
    fn env_var_names_round_trip_through_the_loader() {
        for (section, keys) in KNOWN_KEYS {
            for key in keys.iter() {
                let path = format!("{section}.{key}");
                let var = env_var_for(&path);
                let stripped = var
                    .strip_prefix(ENV_PREFIX)
                    .expect("prefix")
                    .to_ascii_lowercase();
                assert_eq!(map_env_key(&stripped), path);
            }
        }
    }

    #[test]
    fn unknown_key_help_names_the_env_var() {
        let error = unknown_key(Some("qualifier"), "memory_windw");
        let help = error.help().expect("help").to_string();
        assert!(help.contains("did you mean `qualifier.memory_window`"), "{help}");
        assert!(help.contains("LEADGATE_QUALIFIER_MEMORY_WINDOW"), "{help}");
        assert!(help.contains("off_topic_threshold"), "{help}");
    }
}
