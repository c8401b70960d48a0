// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the attachment relay.
//!
//! Provides [`RelayClient`] which base64-encodes attachment bytes, posts the
//! JSON upload envelope to the configured endpoint, and maps the response
//! into the three distinguishable [`RelayError`] kinds.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, warn};

use minutelog_config::model::RelayConfig;
use minutelog_core::{AttachmentRelay, MinutelogError, RelayError};

use crate::types::{UploadRequest, UploadResponse};

/// Status value the relay uses in its success envelope.
const SUCCESS_STATUS: &str = "success";

/// Cap on response body excerpts quoted inside error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// HTTP client for relay uploads.
///
/// One attachment per call, no internal retry: the commit pipeline decides
/// whether resubmitting is worth it, because a retried upload must never
/// re-append a record.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// Creates a relay client from configuration.
    ///
    /// Fails with a config error when no endpoint is set or the HTTP client
    /// cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, MinutelogError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| MinutelogError::Config("relay.endpoint is not configured".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MinutelogError::Config(format!("failed to build relay HTTP client: {e}"))
            })?;

        Ok(Self { client, endpoint })
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AttachmentRelay for RelayClient {
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<String, RelayError> {
        let payload = UploadRequest {
            file: BASE64.encode(bytes),
            filename,
            mime_type,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, filename, size = bytes.len(), "relay response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Transport {
                message: format!("relay returned {status}: {}", excerpt(&body)),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| RelayError::Transport {
            message: format!("failed to read relay response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        let envelope: UploadResponse =
            serde_json::from_str(&body).map_err(|_| RelayError::MalformedResponse {
                message: format!("response is not a JSON envelope: {}", excerpt(&body)),
            })?;

        if envelope.status == SUCCESS_STATUS {
            match envelope.url {
                Some(url) if !url.is_empty() => Ok(url),
                _ => Err(RelayError::MalformedResponse {
                    message: "success envelope is missing `url`".into(),
                }),
            }
        } else {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("relay status `{}`", envelope.status));
            warn!(filename, %message, "relay rejected upload");
            Err(RelayError::Application { message })
        }
    }
}

/// Truncates a body for inclusion in an error message.
fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
