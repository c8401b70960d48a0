// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait for the external append-only tabular store.

use async_trait::async_trait;

use crate::error::StoreError;

/// The two operations this subsystem requires of the record store.
///
/// Rows are data only, in append order, with no header row. Adapters must
/// surface rate limiting as [`StoreError::RateLimited`] so the commit
/// pipeline and the read cache can react (stop vs. propagate) rather than
/// retry blindly. The store is never assumed to have a sole writer.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Reads every row of `table`, oldest first.
    async fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Appends one row to the end of `table`.
    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<(), StoreError>;
}
