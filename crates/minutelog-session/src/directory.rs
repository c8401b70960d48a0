// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The department/group/password allow-list.
//!
//! A pure read-only lookup table loaded wholesale from the store's directory
//! table (through the read cache). Secrets are compared as opaque strings --
//! the behavioral contract is an exact-match gate on three fields; hashing
//! the stored secret is an operator-side concern.

use minutelog_core::DirectoryEntry;

/// Read-only login allow-list plus the browse helpers that feed login
/// selectors.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<DirectoryEntry>,
}

impl Directory {
    /// Wraps entries in store order. Scan order is load order, which makes
    /// duplicate `(department, group)` rows resolve deterministically to the
    /// first match.
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive match on all three fields. No normalization, no
    /// side effects; false on an empty directory.
    pub fn authenticate(&self, department: &str, group: &str, secret: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.department == department && entry.group == group && entry.secret == secret
        })
    }

    /// Unique department names in first-seen order.
    pub fn departments(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.department.as_str()) {
                seen.push(entry.department.as_str());
            }
        }
        seen
    }

    /// Group names within a department, in store order.
    pub fn groups_for(&self, department: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.department == department)
            .map(|entry| entry.group.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(department: &str, group: &str, secret: &str) -> DirectoryEntry {
        DirectoryEntry {
            department: department.to_string(),
            group: group.to_string(),
            secret: secret.to_string(),
        }
    }

    fn directory() -> Directory {
        Directory::new(vec![
            entry("Office A", "G1", "pw1"),
            entry("Office A", "G2", "pw2"),
            entry("Office B", "G1", "pw3"),
        ])
    }

    #[test]
    fn exact_match_authenticates() {
        assert!(directory().authenticate("Office A", "G1", "pw1"));
    }

    #[test]
    fn any_single_field_mismatch_fails() {
        let dir = directory();
        assert!(!dir.authenticate("Office C", "G1", "pw1"));
        assert!(!dir.authenticate("Office A", "G9", "pw1"));
        assert!(!dir.authenticate("Office A", "G1", "pw2"));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let dir = directory();
        assert!(!dir.authenticate("office a", "G1", "pw1"));
        assert!(!dir.authenticate("Office A", "g1", "pw1"));
        assert!(!dir.authenticate("Office A", "G1", "PW1"));
    }

    #[test]
    fn empty_secret_never_matches_a_stored_secret() {
        assert!(!directory().authenticate("Office A", "G1", ""));
    }

    #[test]
    fn empty_directory_rejects_everything() {
        let dir = Directory::new(Vec::new());
        assert!(dir.is_empty());
        assert!(!dir.authenticate("", "", ""));
    }

    #[test]
    fn duplicate_rows_resolve_to_first_match() {
        let dir = Directory::new(vec![
            entry("Office A", "G1", "first"),
            entry("Office A", "G1", "second"),
        ]);
        // Both secrets open the same pair; scan order makes the outcome
        // deterministic rather than ambiguous.
        assert!(dir.authenticate("Office A", "G1", "first"));
        assert!(dir.authenticate("Office A", "G1", "second"));
    }

    #[test]
    fn departments_are_unique_in_first_seen_order() {
        assert_eq!(directory().departments(), vec!["Office A", "Office B"]);
    }

    #[test]
    fn groups_are_scoped_to_their_department() {
        let dir = directory();
        assert_eq!(dir.groups_for("Office A"), vec!["G1", "G2"]);
        assert_eq!(dir.groups_for("Office B"), vec!["G1"]);
        assert!(dir.groups_for("Office C").is_empty());
    }
}
