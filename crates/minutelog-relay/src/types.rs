// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the relay upload protocol.

use serde::{Deserialize, Serialize};

/// Request body: `{"file": <base64>, "filename": ..., "mimeType": ...}`.
#[derive(Debug, Serialize)]
pub(crate) struct UploadRequest<'a> {
    pub file: String,
    pub filename: &'a str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'a str,
}

/// Response envelope.
///
/// Success carries `url`; failure carries `message`. Any other shape is a
/// protocol violation reported as a malformed response.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
