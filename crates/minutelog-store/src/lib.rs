// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-lines implementation of the [`TabularStore`] trait.
//!
//! One file per table under the configured data directory; each row is a JSON
//! array on its own line, so the store is append-only by construction. This
//! is the bundled local adapter -- a remote spreadsheet adapter lives behind
//! the same trait and is outside this workspace.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use minutelog_config::model::StoreConfig;
use minutelog_core::{StoreError, TabularStore};

/// File-backed tabular store, one `<table>.jsonl` per table.
///
/// A local adapter never synthesizes `RateLimited`; that kind belongs to
/// remote adapters.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    data_dir: PathBuf,
}

impl JsonlStore {
    /// Creates a store rooted at the configured data directory.
    ///
    /// The directory is created lazily on the first append.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data_dir: PathBuf::from(&config.data_dir),
        }
    }

    /// Creates a store rooted at an explicit path.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory holding the table files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, table: &str) -> Result<PathBuf, StoreError> {
        if table.is_empty() || table.contains(['/', '\\', '.']) {
            return Err(StoreError::read(format!("invalid table name `{table}`")));
        }
        Ok(self.data_dir.join(format!("{table}.jsonl")))
    }
}

#[async_trait]
impl TabularStore for JsonlStore {
    async fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let path = self.table_path(table)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            // A table that was never appended to is simply empty.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(table, "table file not found, returning empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    message: format!("failed to read {}: {e}", path.display()),
                    source: Some(Box::new(e)),
                });
            }
        };

        let mut rows = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<String> = serde_json::from_str(line).map_err(|e| {
                StoreError::read(format!(
                    "table `{table}` line {index} is not a JSON row: {e}"
                ))
            })?;
            rows.push(row);
        }

        debug!(table, rows = rows.len(), "table read");
        Ok(rows)
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<(), StoreError> {
        let path = self.table_path(table).map_err(|e| match e {
            StoreError::Read { message, source } => StoreError::Write { message, source },
            other => other,
        })?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::Write {
                message: format!("failed to create {}: {e}", self.data_dir.display()),
                source: Some(Box::new(e)),
            })?;

        let mut line = serde_json::to_string(&row).map_err(|e| StoreError::Write {
            message: format!("failed to encode row for `{table}`: {e}"),
            source: Some(Box::new(e)),
        })?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::Write {
                message: format!("failed to open {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::Write {
                message: format!("failed to append to {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?;
        file.flush().await.map_err(|e| StoreError::Write {
            message: format!("failed to flush {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        debug!(table, columns = row.len(), "row appended");
        Ok(())
    }
}
