// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress events and outcome types for a batch commit.
//!
//! A batch moves `Idle -> Running(i) -> {Success | FatalStop(i)}`. There is
//! no internal Cancelled state: a cooperative cancel surfaces as a fatal stop
//! with a [`HaltReason::Cancelled`] at the next item boundary.

use minutelog_core::{RelayError, StoreError};

/// Emitted after each per-item step, append success or not, so a UI can
/// render a live progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitProgress {
    /// Items processed so far (1-indexed after the first item completes).
    pub completed: usize,
    /// Cart size at commit start.
    pub total: usize,
}

impl CommitProgress {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// A per-item attachment upload failure.
///
/// Not fatal: the record is appended with an empty attachment URL and the
/// failure is surfaced here so the caller can resubmit just that attachment.
#[derive(Debug)]
pub struct AttachmentFailure {
    /// Zero-based cart position of the affected item.
    pub index: usize,
    pub filename: String,
    pub error: RelayError,
}

/// What a fully successful batch produced.
#[derive(Debug)]
pub struct CommitReceipt {
    pub appended: usize,
    pub attachment_failures: Vec<AttachmentFailure>,
}

/// Why a batch stopped before its last item.
#[derive(Debug)]
pub enum HaltReason {
    /// The store refused an append. Rate limiting is distinguishable so the
    /// caller can advise waiting before a retry.
    Store(StoreError),
    /// A cooperative cancel observed at an item boundary.
    Cancelled,
}

impl HaltReason {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, HaltReason::Store(e) if e.is_rate_limited())
    }
}

/// Terminal state of one batch commit.
///
/// On a fatal stop the cart is left intact, even though records for the
/// already-processed prefix may exist in the store: this subsystem prefers
/// duplicating a report over silently losing one. Retrying the unmodified
/// cart re-appends that prefix -- callers must tell the user so, not hide it.
#[derive(Debug)]
pub enum CommitOutcome {
    Success(CommitReceipt),
    FatalStop {
        /// Zero-based cart position of the item whose append failed (or the
        /// boundary at which a cancel was observed).
        failed_index: usize,
        /// Records successfully appended before the stop.
        appended: usize,
        reason: HaltReason,
        attachment_failures: Vec<AttachmentFailure>,
    },
}

impl CommitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommitOutcome::Success(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CommitOutcome::FatalStop { reason, .. } if reason.is_rate_limited())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction() {
        let p = CommitProgress {
            completed: 1,
            total: 4,
        };
        assert!((p.fraction() - 0.25).abs() < f64::EPSILON);

        let done = CommitProgress {
            completed: 0,
            total: 0,
        };
        assert!((done.fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_limited_halt_is_distinguishable() {
        let limited = HaltReason::Store(StoreError::RateLimited {
            message: "quota".into(),
        });
        let write = HaltReason::Store(StoreError::write("boom"));
        let cancelled = HaltReason::Cancelled;

        assert!(limited.is_rate_limited());
        assert!(!write.is_rate_limited());
        assert!(!cancelled.is_rate_limited());
    }
}
