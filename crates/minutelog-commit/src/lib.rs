// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch commit pipeline for minutelog.
//!
//! Iterates the session cart strictly in order, uploads attachments through
//! the relay, appends finalized records to the store, reports per-item
//! progress, and defines the failure semantics: attachment failures degrade
//! one item and continue, append failures fatal-stop the batch with the
//! already-committed prefix left standing.

pub mod outcome;
pub mod pipeline;

pub use outcome::{
    AttachmentFailure, CommitOutcome, CommitProgress, CommitReceipt, HaltReason,
};
pub use pipeline::CommitPipeline;
