// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadgate.toml` > `~/.config/leadgate/leadgate.toml` > `/etc/leadgate/leadgate.toml`
//! with environment variable overrides via `LEADGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::{KNOWN_KEYS, LeadgateConfig};

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadgate/leadgate.toml` (system-wide)
/// 3. `~/.config/leadgate/leadgate.toml` (user XDG config)
/// 4. `./leadgate.toml` (local directory)
/// 5. `LEADGATE_*` environment variables
pub fn load_config() -> Result<LeadgateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LeadgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LeadgateConfig::default()))
        .merge(Toml::file("/etc/leadgate/leadgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("leadgate/leadgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("leadgate.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// keys stay intact: `LEADGATE_QUALIFIER_MEMORY_WINDOW` maps to
/// `qualifier.memory_window`, not `qualifier.memory.window`.
fn env_provider() -> Env {
    Env::prefixed("LEADGATE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
///
/// Only the leading section name is turned into a dot; unknown sections pass
/// through unchanged and are rejected later by `deny_unknown_fields`.
pub fn map_env_key(key: &str) -> String {
    for (section, _) in KNOWN_KEYS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}
