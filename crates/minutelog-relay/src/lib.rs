// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment relay client for minutelog.
//!
//! Implements the upload protocol of the intermediary HTTP relay that turns
//! raw attachment bytes into durable public URLs: base64 the bytes, POST a
//! JSON envelope, map the `{status, url}` / `{status, message}` response into
//! the distinguishable [`minutelog_core::RelayError`] kinds.

pub mod client;
mod types;

pub use client::RelayClient;
