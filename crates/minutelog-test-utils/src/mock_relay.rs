// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock attachment relay for deterministic testing.
//!
//! `MockRelay` implements `AttachmentRelay` with a FIFO queue of scripted
//! outcomes and captures every upload it is asked to perform.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use minutelog_core::{AttachmentRelay, RelayError};

/// The failure kind a scripted [`MockRelay`] error should surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRelayFailure {
    Transport,
    MalformedResponse,
    Application(String),
}

impl MockRelayFailure {
    fn to_relay_error(self) -> RelayError {
        match self {
            MockRelayFailure::Transport => RelayError::Transport {
                message: "connection reset (scripted)".into(),
                source: None,
            },
            MockRelayFailure::MalformedResponse => RelayError::MalformedResponse {
                message: "garbled body (scripted)".into(),
            },
            MockRelayFailure::Application(message) => RelayError::Application { message },
        }
    }
}

/// One captured upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// A mock relay that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a
/// deterministic URL derived from the filename is returned.
#[derive(Default)]
pub struct MockRelay {
    outcomes: Mutex<VecDeque<Result<String, MockRelayFailure>>>,
    uploads: Mutex<Vec<CapturedUpload>>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful upload returning `url`.
    pub async fn push_url(&self, url: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(url.into()));
    }

    /// Queues a failed upload.
    pub async fn push_failure(&self, failure: MockRelayFailure) {
        self.outcomes.lock().await.push_back(Err(failure));
    }

    /// Returns every upload captured so far, in call order.
    pub async fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait]
impl AttachmentRelay for MockRelay {
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<String, RelayError> {
        self.uploads.lock().await.push(CapturedUpload {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        });

        match self.outcomes.lock().await.pop_front() {
            Some(Ok(url)) => Ok(url),
            Some(Err(failure)) => Err(failure.to_relay_error()),
            None => Ok(format!("https://files.example/{filename}")),
        }
    }
}
