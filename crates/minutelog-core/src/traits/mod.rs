// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the concrete store and relay crates.

pub mod relay;
pub mod store;

pub use relay::AttachmentRelay;
pub use store::TabularStore;
