// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-boxed read cache shielding the record store from read-quota
//! exhaustion.
//!
//! [`ReadCache::get`] serves a decoded snapshot of the directory and record
//! tables, refreshing it at most once per TTL window. A successful commit
//! calls [`ReadCache::invalidate`] so the committing session observes its own
//! writes immediately; other sessions may see up to one TTL window of
//! staleness, which is accepted and documented. A failed refresh propagates --
//! the cache never serves data past TTL expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use minutelog_config::model::{CacheConfig, StoreConfig};
use minutelog_core::{DirectoryEntry, Record, StoreError, TabularStore};

/// The cached, time-boxed copy of directory + record data served to readers.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    pub directory: Vec<DirectoryEntry>,
    pub records: Vec<Record>,
    pub fetched_at: Instant,
}

/// TTL-bound snapshot cache over a [`TabularStore`].
///
/// The refresh path holds one `tokio::sync::Mutex`, which doubles as the
/// single-flight guarantee: a caller arriving while a refresh is in flight
/// waits for and reuses its result instead of issuing a duplicate external
/// fetch.
pub struct ReadCache {
    store: Arc<dyn TabularStore>,
    directory_table: String,
    records_table: String,
    ttl: Duration,
    snapshot: Mutex<Option<Arc<CacheSnapshot>>>,
}

impl ReadCache {
    /// Creates a cache over `store` using the configured table names and TTL.
    pub fn new(store: Arc<dyn TabularStore>, store_config: &StoreConfig, cache_config: &CacheConfig) -> Self {
        Self {
            store,
            directory_table: store_config.directory_table.clone(),
            records_table: store_config.records_table.clone(),
            ttl: Duration::from_secs(cache_config.ttl_secs),
            snapshot: Mutex::new(None),
        }
    }

    /// Returns the current snapshot, refreshing it when older than the TTL.
    ///
    /// A refresh failure propagates; the previous (expired) snapshot is never
    /// served in its place.
    pub async fn get(&self) -> Result<Arc<CacheSnapshot>, StoreError> {
        let mut guard = self.snapshot.lock().await;

        if let Some(snapshot) = guard.as_ref() {
            let age = snapshot.fetched_at.elapsed();
            if age < self.ttl {
                debug!(age_ms = age.as_millis() as u64, "serving cached snapshot");
                return Ok(Arc::clone(snapshot));
            }
        }

        let snapshot = Arc::new(self.fetch().await?);
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drops the held snapshot so the next [`get`](Self::get) fetches fresh
    /// regardless of remaining TTL.
    ///
    /// Called synchronously after any successful append, giving the
    /// committing session read-your-write semantics.
    pub async fn invalidate(&self) {
        *self.snapshot.lock().await = None;
        debug!("snapshot invalidated");
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn fetch(&self) -> Result<CacheSnapshot, StoreError> {
        debug!(
            directory_table = %self.directory_table,
            records_table = %self.records_table,
            "refreshing snapshot from store"
        );

        let directory_rows = self.store.read_all(&self.directory_table).await?;
        let record_rows = self.store.read_all(&self.records_table).await?;

        let directory = directory_rows
            .iter()
            .enumerate()
            .map(|(i, row)| DirectoryEntry::from_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;
        let records = record_rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::from_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            directory_rows = directory.len(),
            record_rows = records.len(),
            "snapshot refreshed"
        );

        Ok(CacheSnapshot {
            directory,
            records,
            fetched_at: Instant::now(),
        })
    }
}
