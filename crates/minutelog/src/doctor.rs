// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutelog doctor` command implementation.
//!
//! Runs diagnostic checks against the environment to identify configuration
//! issues, connectivity problems, and store problems before they surface
//! mid-commit.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use minutelog_config::model::MinutelogConfig;
use minutelog_core::{MinutelogError, TabularStore};
use minutelog_store::JsonlStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

/// Runs the `minutelog doctor` command. With `--plain`, disables colors.
pub async fn run_doctor(config: &MinutelogConfig, plain: bool) -> Result<(), MinutelogError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_config().await,
        check_data_dir(&config.store.data_dir).await,
        check_relay(config).await,
        check_store_read(config).await,
    ];

    println!();
    println!("  minutelog doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Warn => {
                warn_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "!".yellow(),
                        result.name,
                        result.message.yellow()
                    )
                } else {
                    format!(
                        "    [WARN] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<16} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<16} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

/// Check configuration loads without errors.
async fn check_config() -> CheckResult {
    let start = Instant::now();
    match minutelog_config::load_and_validate() {
        Ok(_) => CheckResult {
            name: "Configuration".to_string(),
            status: CheckStatus::Pass,
            message: "valid".to_string(),
            duration: start.elapsed(),
        },
        Err(errors) => CheckResult {
            name: "Configuration".to_string(),
            status: CheckStatus::Fail,
            message: format!("{} error(s)", errors.len()),
            duration: start.elapsed(),
        },
    }
}

/// Check the store data directory exists.
async fn check_data_dir(data_dir: &str) -> CheckResult {
    let start = Instant::now();
    let path = std::path::Path::new(data_dir);

    if !path.exists() {
        return CheckResult {
            name: "Data directory".to_string(),
            status: CheckStatus::Warn,
            message: format!("not found: {data_dir} (will be created on first append)"),
            duration: start.elapsed(),
        };
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => CheckResult {
            name: "Data directory".to_string(),
            status: CheckStatus::Pass,
            message: "accessible".to_string(),
            duration: start.elapsed(),
        },
        Ok(_) => CheckResult {
            name: "Data directory".to_string(),
            status: CheckStatus::Fail,
            message: format!("{data_dir} is not a directory"),
            duration: start.elapsed(),
        },
        Err(e) => CheckResult {
            name: "Data directory".to_string(),
            status: CheckStatus::Fail,
            message: format!("cannot access: {e}"),
            duration: start.elapsed(),
        },
    }
}

/// Check relay endpoint reachability via HEAD request.
async fn check_relay(config: &MinutelogConfig) -> CheckResult {
    let start = Instant::now();

    let Some(endpoint) = &config.relay.endpoint else {
        return CheckResult {
            name: "Relay".to_string(),
            status: CheckStatus::Warn,
            message: "no endpoint configured (attachments disabled)".to_string(),
            duration: start.elapsed(),
        };
    };

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult {
                name: "Relay".to_string(),
                status: CheckStatus::Fail,
                message: format!("HTTP client error: {e}"),
                duration: start.elapsed(),
            };
        }
    };

    match client.head(endpoint).send().await {
        Ok(_resp) => CheckResult {
            name: "Relay".to_string(),
            status: CheckStatus::Pass,
            message: "reachable".to_string(),
            duration: start.elapsed(),
        },
        Err(e) => {
            let msg = if e.is_timeout() {
                "timeout (5s)".to_string()
            } else if e.is_connect() {
                "connection refused".to_string()
            } else {
                format!("error: {e}")
            };
            CheckResult {
                name: "Relay".to_string(),
                status: CheckStatus::Fail,
                message: msg,
                duration: start.elapsed(),
            }
        }
    }
}

/// Check both store tables read cleanly.
async fn check_store_read(config: &MinutelogConfig) -> CheckResult {
    let start = Instant::now();
    let store = JsonlStore::new(&config.store);

    let directory = store.read_all(&config.store.directory_table).await;
    let records = store.read_all(&config.store.records_table).await;

    match (directory, records) {
        (Ok(directory), Ok(records)) => CheckResult {
            name: "Store read".to_string(),
            status: CheckStatus::Pass,
            message: format!(
                "{} directory row(s), {} record(s)",
                directory.len(),
                records.len()
            ),
            duration: start.elapsed(),
        },
        (Err(e), _) | (_, Err(e)) => CheckResult {
            name: "Store read".to_string(),
            status: CheckStatus::Fail,
            message: e.to_string(),
            duration: start.elapsed(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_result_has_required_fields() {
        let result = CheckResult {
            name: "test".to_string(),
            status: CheckStatus::Pass,
            message: "ok".to_string(),
            duration: Duration::from_millis(5),
        };
        assert_eq!(result.name, "test");
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "ok");
        assert_eq!(result.duration.as_millis(), 5);
    }

    #[tokio::test]
    async fn check_data_dir_missing_warns() {
        let result = check_data_dir("/tmp/nonexistent-minutelog-test-xyz").await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[tokio::test]
    async fn check_data_dir_present_passes() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_data_dir(dir.path().to_str().unwrap()).await;
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn check_relay_unconfigured_warns() {
        let config = MinutelogConfig::default();
        let result = check_relay(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("no endpoint"));
    }

    #[tokio::test]
    async fn check_store_read_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = MinutelogConfig::default();
        config.store.data_dir = dir.path().to_string_lossy().into_owned();

        let store = JsonlStore::new(&config.store);
        store
            .append_row(
                "config",
                vec!["Office A".into(), "G1".into(), "pw".into()],
            )
            .await
            .unwrap();

        let result = check_store_read(&config).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("1 directory row(s)"));
    }
}
