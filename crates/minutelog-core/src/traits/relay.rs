// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait for the attachment relay.

use async_trait::async_trait;

use crate::error::RelayError;

/// Moves one attachment's bytes to durable storage and returns a public URL.
///
/// Implementations do not retry internally: retry policy belongs to the
/// caller, since retrying an upload must never re-append a record.
#[async_trait]
pub trait AttachmentRelay: Send + Sync {
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<String, RelayError>;
}
