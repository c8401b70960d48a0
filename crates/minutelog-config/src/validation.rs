// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as URL schemes, non-empty table names, and positive
//! durations.

use crate::diagnostic::ConfigError;
use crate::model::MinutelogConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MinutelogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.log.level
            ),
        });
    }

    if let Some(endpoint) = &config.relay.endpoint {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            errors.push(ConfigError::Validation {
                message: "relay.endpoint must not be empty when set".to_string(),
            });
        } else if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("relay.endpoint `{trimmed}` must be an http(s) URL"),
            });
        }
    }

    if config.relay.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.store.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.data_dir must not be empty".to_string(),
        });
    }

    for (key, value) in [
        ("store.directory_table", &config.store.directory_table),
        ("store.records_table", &config.store.records_table),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if config.store.directory_table == config.store.records_table {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.directory_table and store.records_table must differ, both are `{}`",
                config.store.directory_table
            ),
        });
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.ttl_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
