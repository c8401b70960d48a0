// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session-local staging cart.
//!
//! An ordered FIFO of not-yet-committed entries. Cart order defines commit
//! order, and therefore the relative `submitted_at` ordering of the records
//! it produces. Cleared wholesale on logout, on explicit discard, and by the
//! pipeline after a fully successful commit.

use tracing::debug;

use minutelog_core::{Attachment, CartItem, MinutelogError};

/// Ordered sequence of staged entries awaiting batch submission.
#[derive(Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the end of the cart.
    ///
    /// Empty or whitespace-only content is a validation error, recovered by
    /// re-prompting -- never a system fault.
    pub fn stage(
        &mut self,
        content: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Result<(), MinutelogError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(MinutelogError::Validation(
                "report content must not be empty".into(),
            ));
        }

        debug!(
            position = self.items.len(),
            has_attachment = attachment.is_some(),
            "entry staged"
        );
        self.items.push(CartItem {
            content,
            attachment,
        });
        Ok(())
    }

    /// Clears the cart unconditionally. Idempotent.
    pub fn discard_all(&mut self) {
        if !self.items.is_empty() {
            debug!(discarded = self.items.len(), "cart discarded");
        }
        self.items.clear();
    }

    /// Read-only view for display; restartable, does not mutate state.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
