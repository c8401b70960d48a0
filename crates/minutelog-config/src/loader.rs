// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./minutelog.toml` > `~/.config/minutelog/minutelog.toml`
//! > `/etc/minutelog/minutelog.toml` with environment variable overrides via
//! `MINUTELOG_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MinutelogConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/minutelog/minutelog.toml` (system-wide)
/// 3. `~/.config/minutelog/minutelog.toml` (user XDG config)
/// 4. `./minutelog.toml` (local directory)
/// 5. `MINUTELOG_*` environment variables
pub fn load_config() -> Result<MinutelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinutelogConfig::default()))
        .merge(Toml::file("/etc/minutelog/minutelog.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("minutelog/minutelog.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("minutelog.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MinutelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinutelogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MinutelogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MinutelogConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MINUTELOG_CACHE_TTL_SECS` must map to
/// `cache.ttl_secs`, not `cache.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("MINUTELOG_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MINUTELOG_RELAY_TIMEOUT_SECS -> "relay_timeout_secs"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("log_", "log.", 1)
            .replacen("relay_", "relay.", 1)
            .replacen("store_", "store.", 1)
            .replacen("cache_", "cache.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.store.directory_table, "config");
        assert_eq!(config.store.records_table, "records");
        assert!(config.relay.endpoint.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[relay]
endpoint = "https://relay.example/upload"
timeout_secs = 10

[cache]
ttl_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(
            config.relay.endpoint.as_deref(),
            Some("https://relay.example/upload")
        );
        assert_eq!(config.relay.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 5);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
[cache]
ttl = 5
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_vars_override_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "minutelog.toml",
                r#"
[cache]
ttl_secs = 120
"#,
            )?;
            jail.set_env("MINUTELOG_CACHE_TTL_SECS", "7");
            let config: MinutelogConfig = Figment::new()
                .merge(Serialized::defaults(MinutelogConfig::default()))
                .merge(Toml::file("minutelog.toml"))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.cache.ttl_secs, 7);
            Ok(())
        });
    }
}
