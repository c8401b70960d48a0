// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session layer for minutelog: directory authentication, the staging cart,
//! and the per-session context that ties them to an identity.

pub mod cart;
pub mod directory;
pub mod session;

pub use cart::Cart;
pub use directory::Directory;
pub use session::Session;
