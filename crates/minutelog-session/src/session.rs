// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session context: identity bound at login plus the staging cart.
//!
//! Explicitly a value passed to pipeline calls, never process-global state.
//! Created by [`Session::login`], destroyed by [`Session::logout`] (or drop);
//! nothing survives the process, so every session re-authenticates.

use tracing::{info, warn};

use minutelog_core::{Identity, MinutelogError};

use crate::cart::Cart;
use crate::directory::Directory;

/// One authenticated user interaction: identity + cart.
#[derive(Debug)]
pub struct Session {
    identity: Identity,
    cart: Cart,
}

impl Session {
    /// Authenticates against the directory and opens a session with an empty
    /// cart.
    pub fn login(
        directory: &Directory,
        department: &str,
        group: &str,
        secret: &str,
    ) -> Result<Self, MinutelogError> {
        if !directory.authenticate(department, group, secret) {
            warn!(department, group, "login rejected");
            return Err(MinutelogError::Unauthorized {
                department: department.to_string(),
                group: group.to_string(),
            });
        }

        info!(department, group, "login accepted");
        Ok(Self {
            identity: Identity {
                department: department.to_string(),
                group: group.to_string(),
            },
            cart: Cart::new(),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Closes the session, discarding identity and any staged entries
    /// wholesale.
    pub fn logout(self) {
        info!(
            department = %self.identity.department,
            group = %self.identity.group,
            discarded = self.cart.len(),
            "session closed"
        );
    }
}
