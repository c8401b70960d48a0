// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the minutelog submission pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level minutelog configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MinutelogConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Attachment relay settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Read cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Attachment relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Relay endpoint URL. `None` disables attachment uploads; staging an
    /// attachment then committing without an endpoint fails per item.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// HTTP timeout for one upload, in seconds.
    #[serde(default = "default_relay_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_relay_timeout_secs(),
        }
    }
}

fn default_relay_timeout_secs() -> u64 {
    30
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the bundled JSONL store's table files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Name of the login allow-list table.
    #[serde(default = "default_directory_table")]
    pub directory_table: String,

    /// Name of the record log table.
    #[serde(default = "default_records_table")]
    pub records_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            directory_table: default_directory_table(),
            records_table: default_records_table(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("minutelog"))
        .unwrap_or_else(|| std::path::PathBuf::from("minutelog-data"))
        .to_string_lossy()
        .into_owned()
}

fn default_directory_table() -> String {
    minutelog_core::types::DEFAULT_DIRECTORY_TABLE.to_string()
}

fn default_records_table() -> String {
    minutelog_core::types::DEFAULT_RECORDS_TABLE.to_string()
}

/// Read cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Snapshot time-to-live in seconds. Reads inside the window reuse the
    /// snapshot; a successful commit invalidates it regardless.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    60
}
