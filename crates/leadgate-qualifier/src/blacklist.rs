// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static deny-list of lead identifiers.

use std::collections::HashSet;

use leadgate_config::model::BlacklistConfig;
pub use leadgate_config::model::normalize_identifier;

/// Outcome of a blacklist lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistVerdict {
    Blocked,
    Allowed,
}

impl BlacklistVerdict {
    pub fn is_blocked(self) -> bool {
        matches!(self, BlacklistVerdict::Blocked)
    }
}

/// Set of blocked identifiers, stored in normalized form.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashSet<String>,
}

impl Blacklist {
    /// Builds a blacklist from raw identifiers. Entries that normalize to an
    /// empty string are dropped.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = identifiers
            .into_iter()
            .map(|id| normalize_identifier(id.as_ref()))
            .filter(|id| !id.is_empty())
            .collect();
        Self { entries }
    }

    /// Looks up an identifier. Malformed or empty input is simply not blocked.
    pub fn check(&self, identifier: &str) -> BlacklistVerdict {
        let normalized = normalize_identifier(identifier);
        if !normalized.is_empty() && self.entries.contains(&normalized) {
            BlacklistVerdict::Blocked
        } else {
            BlacklistVerdict::Allowed
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&BlacklistConfig> for Blacklist {
    fn from(config: &BlacklistConfig) -> Self {
        Self::new(&config.identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Blacklist {
        Blacklist::new(["123456789", "999999999", "spam_user"])
    }

    #[test]
    fn exact_identifier_is_blocked() {
        assert_eq!(seeded().check("123456789"), BlacklistVerdict::Blocked);
        assert!(seeded().check("spam_user").is_blocked());
    }

    #[test]
    fn formatting_is_ignored_on_lookup() {
        let list = seeded();
        assert!(list.check("123-456-789").is_blocked());
        assert!(list.check(" 999 999 999 ").is_blocked());
        assert!(list.check("123\t456\n789").is_blocked());
    }

    #[test]
    fn configured_entries_are_normalized_too() {
        let list = Blacklist::new(["555-0100"]);
        assert!(list.check("5550100").is_blocked());
        assert!(list.check("555 0100").is_blocked());
    }

    #[test]
    fn unknown_and_empty_identifiers_are_allowed() {
        let list = seeded();
        assert_eq!(list.check("600123456"), BlacklistVerdict::Allowed);
        assert_eq!(list.check(""), BlacklistVerdict::Allowed);
        assert_eq!(list.check(" - - "), BlacklistVerdict::Allowed);
    }

    #[test]
    fn underscores_are_significant() {
        assert!(!seeded().check("spamuser").is_blocked());
    }

    #[test]
    fn blank_config_entries_are_dropped() {
        let list = Blacklist::new(["", "  ", "--", "abc"]);
        assert_eq!(list.len(), 1);
        assert!(!list.check("").is_blocked());
    }

    #[test]
    fn builds_from_config_defaults() {
        let list = Blacklist::from(&BlacklistConfig::default());
        assert_eq!(list.len(), 3);
        assert!(list.check("999-999-999").is_blocked());
    }
}
