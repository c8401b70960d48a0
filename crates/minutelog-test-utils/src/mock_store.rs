// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tabular store for deterministic testing.
//!
//! `MockStore` implements `TabularStore` over in-memory tables, counts
//! external calls (the read cache's quota-shielding contract is asserted via
//! these counters), and supports scripted one-shot failures including a
//! rate-limit at a chosen append position.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use minutelog_core::{StoreError, TabularStore};

/// The failure kind a scripted [`MockStore`] error should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    RateLimited,
    Write,
    Read,
}

impl MockFailure {
    fn to_store_error(self) -> StoreError {
        match self {
            MockFailure::RateLimited => StoreError::RateLimited {
                message: "quota exhausted (scripted)".into(),
            },
            MockFailure::Write => StoreError::write("append refused (scripted)"),
            MockFailure::Read => StoreError::read("fetch refused (scripted)"),
        }
    }
}

/// An in-memory `TabularStore` with call counting and scripted failures.
///
/// Scripted failures fire once and are consumed, so a retried operation
/// succeeds -- which is exactly what the at-least-once commit tests need to
/// observe duplication.
#[derive(Default)]
pub struct MockStore {
    tables: Mutex<HashMap<String, Vec<Vec<String>>>>,
    read_calls: AtomicUsize,
    append_calls: AtomicUsize,
    fail_append_at: Mutex<Option<(usize, MockFailure)>>,
    fail_next_read: Mutex<Option<MockFailure>>,
    read_delay: Mutex<Option<Duration>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents of `table`.
    pub async fn seed(&self, table: &str, rows: Vec<Vec<String>>) {
        self.tables.lock().await.insert(table.to_string(), rows);
    }

    /// Returns a copy of `table`'s rows (empty if the table does not exist).
    pub async fn rows(&self, table: &str) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `read_all` calls made so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of `append_row` calls made so far.
    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Scripts the `nth` append (1-indexed, counted across tables) to fail.
    pub async fn fail_append_at(&self, nth: usize, failure: MockFailure) {
        *self.fail_append_at.lock().await = Some((nth, failure));
    }

    /// Scripts the next `read_all` call to fail.
    pub async fn fail_next_read(&self, failure: MockFailure) {
        *self.fail_next_read.lock().await = Some(failure);
    }

    /// Adds an artificial delay to every `read_all`, for single-flight tests.
    pub async fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().await = Some(delay);
    }
}

#[async_trait]
impl TabularStore for MockStore {
    async fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let delay = *self.read_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.fail_next_read.lock().await.take() {
            return Err(failure.to_store_error());
        }

        Ok(self.rows(table).await)
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<(), StoreError> {
        let count = self.append_calls.fetch_add(1, Ordering::SeqCst) + 1;

        let mut scripted = self.fail_append_at.lock().await;
        if let Some((nth, failure)) = *scripted {
            if count == nth {
                *scripted = None;
                return Err(failure.to_store_error());
            }
        }
        drop(scripted);

        self.tables
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }
}
