// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutelog board` command implementation.
//!
//! Read-only view of the record log: records grouped by meeting date (newest
//! first), then by department, with attachment links where present. Reads go
//! through the cache like every other read path.

use std::sync::Arc;

use chrono::NaiveDate;
use colored::Colorize;

use minutelog_cache::ReadCache;
use minutelog_config::model::MinutelogConfig;
use minutelog_core::{MinutelogError, Record};
use minutelog_store::JsonlStore;

/// Runs the `minutelog board` command.
pub async fn run_board(
    config: &MinutelogConfig,
    date: Option<NaiveDate>,
) -> Result<(), MinutelogError> {
    let store = Arc::new(JsonlStore::new(&config.store));
    let cache = ReadCache::new(store, &config.store, &config.cache);
    let snapshot = cache.get().await?;
    print!("{}", render_board(&snapshot.records, date));
    Ok(())
}

/// Renders the board view for the given records.
///
/// Pure so it can be tested without a store.
pub fn render_board(records: &[Record], date: Option<NaiveDate>) -> String {
    let mut out = String::new();

    if records.is_empty() {
        out.push_str("no records yet\n");
        return out;
    }

    let mut dates: Vec<NaiveDate> = Vec::new();
    for record in records {
        if !dates.contains(&record.meeting_date) {
            dates.push(record.meeting_date);
        }
    }
    dates.sort();
    dates.reverse();

    let selected: Vec<NaiveDate> = match date {
        Some(d) => vec![d],
        None => dates,
    };

    for meeting_date in &selected {
        let daily: Vec<&Record> = records
            .iter()
            .filter(|r| r.meeting_date == *meeting_date)
            .collect();
        if daily.is_empty() {
            out.push_str(&format!("no records for {meeting_date}\n"));
            continue;
        }

        out.push_str(&format!("{}\n", meeting_date.to_string().bold()));

        let mut departments: Vec<&str> = Vec::new();
        for record in &daily {
            if !departments.contains(&record.department.as_str()) {
                departments.push(record.department.as_str());
            }
        }

        for department in departments {
            out.push_str(&format!("  {}\n", department.cyan()));
            for record in daily.iter().filter(|r| r.department == department) {
                out.push_str(&format!(
                    "    {} | {}\n",
                    record.group.green(),
                    record.content
                ));
                if !record.attachment_url.is_empty() {
                    out.push_str(&format!(
                        "      {} {}\n",
                        "attachment:".dimmed(),
                        record.attachment_url
                    ));
                }
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutelog_core::Identity;

    fn record(date: (i32, u32, u32), department: &str, group: &str, content: &str) -> Record {
        Record::new(
            &Identity {
                department: department.to_string(),
                group: group.to_string(),
            },
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            content.to_string(),
            String::new(),
        )
    }

    #[test]
    fn empty_log_renders_placeholder() {
        assert_eq!(render_board(&[], None), "no records yet\n");
    }

    #[test]
    fn newest_meeting_date_renders_first() {
        let records = vec![
            record((2026, 7, 29), "Office A", "G1", "older"),
            record((2026, 8, 5), "Office A", "G1", "newer"),
        ];
        let out = render_board(&records, None);
        let newer = out.find("2026-08-05").unwrap();
        let older = out.find("2026-07-29").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn date_filter_scopes_the_view() {
        let records = vec![
            record((2026, 7, 29), "Office A", "G1", "older"),
            record((2026, 8, 5), "Office A", "G1", "newer"),
        ];
        let out = render_board(&records, NaiveDate::from_ymd_opt(2026, 8, 5));
        assert!(out.contains("newer"));
        assert!(!out.contains("older"));
    }

    #[test]
    fn records_group_under_their_department() {
        let records = vec![
            record((2026, 8, 5), "Office A", "G1", "alpha"),
            record((2026, 8, 5), "Office B", "G1", "beta"),
            record((2026, 8, 5), "Office A", "G2", "gamma"),
        ];
        let out = render_board(&records, None);
        // Office A appears once, with both of its groups beneath it.
        assert_eq!(out.matches("Office A").count(), 1);
        assert!(out.contains("alpha"));
        assert!(out.contains("gamma"));
    }

    #[test]
    fn attachment_links_render_when_present() {
        let mut with_url = record((2026, 8, 5), "Office A", "G1", "report");
        with_url.attachment_url = "https://files.example/x".to_string();
        let out = render_board(&[with_url], None);
        assert!(out.contains("https://files.example/x"));
    }

    #[test]
    fn missing_date_filter_says_so() {
        let records = vec![record((2026, 8, 5), "Office A", "G1", "x")];
        let out = render_board(&records, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert!(out.contains("no records for 2026-01-01"));
    }
}
