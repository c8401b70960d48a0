// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for minutelog integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory tabular store with call counters and scripted failures
//! - [`MockRelay`] - Attachment relay with scripted outcomes and upload capture

pub mod mock_relay;
pub mod mock_store;

pub use mock_relay::{CapturedUpload, MockRelay, MockRelayFailure};
pub use mock_store::{MockFailure, MockStore};
