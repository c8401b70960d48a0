// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the minutelog submission pipeline.

use thiserror::Error;

/// The primary error type used across minutelog crates.
#[derive(Debug, Error)]
pub enum MinutelogError {
    /// Input rejected at the staging surface (empty content, bad date).
    /// Recovered locally by re-prompting, never a system fault.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credentials did not match any directory row.
    #[error("login rejected for {department}/{group}")]
    Unauthorized { department: String, group: String },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Relay upload failure, by kind.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Record store failure, by kind.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures of the attachment relay, kept distinguishable so callers can
/// decide whether resubmitting the attachment is worth trying.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Network failure or non-2xx HTTP status from the relay endpoint.
    #[error("relay transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Response body that is not the expected JSON envelope.
    #[error("relay returned a malformed response: {message}")]
    MalformedResponse { message: String },

    /// Well-formed envelope with a non-success status; the relay rejected
    /// the upload (oversized file, unsupported type, ...).
    #[error("relay rejected the upload: {message}")]
    Application { message: String },
}

impl RelayError {
    /// Transport and malformed-response failures are plausibly transient;
    /// application rejections usually need user correction first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RelayError::Transport { .. } | RelayError::MalformedResponse { .. }
        )
    }
}

/// Failures of the tabular record store.
///
/// Rate limiting is its own kind: the commit pipeline fatal-stops on it with
/// wait-and-retry guidance, and the read cache propagates it instead of
/// retrying blindly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store signalled a rate/quota limit.
    #[error("store rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Read path failure (network, decode, missing table).
    #[error("store read failed: {message}")]
    Read {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Append failure other than rate limiting.
    #[error("store write failed: {message}")]
    Write {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited { .. })
    }

    /// Read-kind error without an underlying cause.
    pub fn read(message: impl Into<String>) -> Self {
        StoreError::Read {
            message: message.into(),
            source: None,
        }
    }

    /// Write-kind error without an underlying cause.
    pub fn write(message: impl Into<String>) -> Self {
        StoreError::Write {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_retryability_by_kind() {
        let transport = RelayError::Transport {
            message: "connection reset".into(),
            source: None,
        };
        let malformed = RelayError::MalformedResponse {
            message: "not json".into(),
        };
        let application = RelayError::Application {
            message: "file too large".into(),
        };

        assert!(transport.is_retryable());
        assert!(malformed.is_retryable());
        assert!(!application.is_retryable());
    }

    #[test]
    fn store_rate_limit_is_distinguishable() {
        let limited = StoreError::RateLimited {
            message: "quota exhausted".into(),
        };
        let write = StoreError::write("disk full");

        assert!(limited.is_rate_limited());
        assert!(!write.is_rate_limited());
    }

    #[test]
    fn sub_errors_convert_into_minutelog_error() {
        let err: MinutelogError = StoreError::read("boom").into();
        assert!(matches!(err, MinutelogError::Store(_)));

        let err: MinutelogError = RelayError::Application {
            message: "rejected".into(),
        }
        .into();
        assert!(matches!(err, MinutelogError::Relay(_)));
    }
}
