// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types and row codecs shared across the minutelog workspace.
//!
//! The external store is a plain tabular surface: rows are vectors of strings
//! in a fixed column order with no header row. The codecs here are the single
//! source of truth for that layout.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Column-order timestamp format for the `submitted_at` record column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format for the `meeting_date` record column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default name of the directory (allow-list) table.
pub const DEFAULT_DIRECTORY_TABLE: &str = "config";

/// Default name of the record log table.
pub const DEFAULT_RECORDS_TABLE: &str = "records";

/// The identity bound to a session at login. Authorizes staging and
/// committing; dropped with the session, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub department: String,
    pub group: String,
}

/// One row of the login allow-list.
///
/// Loaded wholesale from the directory table. The secret is compared as an
/// opaque string; hashing stored secrets is an operator-side concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub department: String,
    pub group: String,
    pub secret: String,
}

impl DirectoryEntry {
    /// Decodes a `[department, group, password]` row.
    pub fn from_row(index: usize, row: &[String]) -> Result<Self, StoreError> {
        if row.len() < 3 {
            return Err(StoreError::read(format!(
                "directory row {index} has {} columns, expected 3",
                row.len()
            )));
        }
        Ok(Self {
            department: row[0].clone(),
            group: row[1].clone(),
            secret: row[2].clone(),
        })
    }
}

/// Raw attachment bytes staged alongside a report entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// A staged, not-yet-committed report entry.
///
/// Exists only inside one authenticated session; becomes a [`Record`] via the
/// commit pipeline or is discarded with the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub content: String,
    pub attachment: Option<Attachment>,
}

/// One committed report row in the append-only record log.
///
/// Created exclusively by the commit pipeline; never mutated or deleted by
/// this subsystem once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique key for the row (uuid v4).
    pub id: String,
    /// Wall-clock submission instant.
    pub submitted_at: NaiveDateTime,
    /// Meeting the report belongs to.
    pub meeting_date: NaiveDate,
    pub department: String,
    pub group: String,
    pub content: String,
    /// Public URL returned by the relay, or empty when the entry had no
    /// attachment (or its upload failed).
    pub attachment_url: String,
}

impl Record {
    /// Builds a fresh record for a cart item at commit time.
    pub fn new(
        identity: &Identity,
        meeting_date: NaiveDate,
        content: String,
        attachment_url: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            submitted_at: chrono::Local::now().naive_local(),
            meeting_date,
            department: identity.department.clone(),
            group: identity.group.clone(),
            content,
            attachment_url,
        }
    }

    /// Encodes the fixed column order:
    /// `[id, submitted_at, meeting_date, department, group, content, attachment_url]`.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.submitted_at.format(TIMESTAMP_FORMAT).to_string(),
            self.meeting_date.format(DATE_FORMAT).to_string(),
            self.department.clone(),
            self.group.clone(),
            self.content.clone(),
            self.attachment_url.clone(),
        ]
    }

    /// Decodes a record row.
    ///
    /// A missing seventh column decodes as an empty attachment URL (rows
    /// written before attachments existed); fewer than six columns or
    /// unparseable date fields are a read failure naming the row.
    pub fn from_row(index: usize, row: &[String]) -> Result<Self, StoreError> {
        if row.len() < 6 {
            return Err(StoreError::read(format!(
                "record row {index} has {} columns, expected at least 6",
                row.len()
            )));
        }
        let submitted_at = NaiveDateTime::parse_from_str(&row[1], TIMESTAMP_FORMAT)
            .map_err(|e| {
                StoreError::read(format!(
                    "record row {index} has bad submitted_at `{}`: {e}",
                    row[1]
                ))
            })?;
        let meeting_date = NaiveDate::parse_from_str(&row[2], DATE_FORMAT).map_err(|e| {
            StoreError::read(format!(
                "record row {index} has bad meeting_date `{}`: {e}",
                row[2]
            ))
        })?;
        Ok(Self {
            id: row[0].clone(),
            submitted_at,
            meeting_date,
            department: row[3].clone(),
            group: row[4].clone(),
            content: row[5].clone(),
            attachment_url: row.get(6).cloned().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            department: "Office A".into(),
            group: "G1".into(),
        }
    }

    #[test]
    fn record_row_round_trip() {
        let record = Record::new(
            &identity(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            "weekly report".into(),
            "https://files.example/abc".into(),
        );
        let row = record.to_row();
        assert_eq!(row.len(), 7);

        let decoded = Record::from_row(0, &row).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn record_ids_are_unique_per_construction() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let a = Record::new(&identity(), date, "x".into(), String::new());
        let b = Record::new(&identity(), date, "x".into(), String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_attachment_column_decodes_empty() {
        let row = vec![
            "id-1".to_string(),
            "2026-08-05 10:30:00".to_string(),
            "2026-08-05".to_string(),
            "Office A".to_string(),
            "G1".to_string(),
            "content".to_string(),
        ];
        let record = Record::from_row(0, &row).unwrap();
        assert_eq!(record.attachment_url, "");
    }

    #[test]
    fn short_record_row_is_a_read_error() {
        let row = vec!["id-1".to_string(), "2026-08-05 10:30:00".to_string()];
        let err = Record::from_row(3, &row).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn bad_timestamp_is_a_read_error() {
        let row = vec![
            "id-1".to_string(),
            "yesterday".to_string(),
            "2026-08-05".to_string(),
            "Office A".to_string(),
            "G1".to_string(),
            "content".to_string(),
            String::new(),
        ];
        let err = Record::from_row(0, &row).unwrap_err();
        assert!(err.to_string().contains("submitted_at"));
    }

    #[test]
    fn directory_row_decodes() {
        let row = vec!["Office A".to_string(), "G1".to_string(), "pw1".to_string()];
        let entry = DirectoryEntry::from_row(0, &row).unwrap();
        assert_eq!(entry.department, "Office A");
        assert_eq!(entry.group, "G1");
        assert_eq!(entry.secret, "pw1");
    }

    #[test]
    fn short_directory_row_is_a_read_error() {
        let row = vec!["Office A".to_string()];
        assert!(DirectoryEntry::from_row(0, &row).is_err());
    }
}
