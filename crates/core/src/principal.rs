//! The identity an operation is performed as.
//!
//! Every ledger operation receives an [`ActingPrincipal`] instead of a loose
//! `is_admin` flag, so admin bypasses are decided in exactly one place.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActingPrincipal {
    /// `None` for the scheduler / system actor.
    pub actor_id: Option<DbId>,
    pub is_admin: bool,
}

impl ActingPrincipal {
    pub fn user(user_id: DbId) -> Self {
        Self {
            actor_id: Some(user_id),
            is_admin: false,
        }
    }

    pub fn admin(user_id: DbId) -> Self {
        Self {
            actor_id: Some(user_id),
            is_admin: true,
        }
    }

    /// The batch runner. Bypasses user-facing restrictions like an admin.
    pub fn system() -> Self {
        Self {
            actor_id: None,
            is_admin: true,
        }
    }

    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin role required".into()))
        }
    }

    /// Non-admins may only act on their own orders and templates.
    pub fn require_owner_or_admin(&self, owner_id: DbId) -> Result<(), CoreError> {
        if self.is_admin || self.actor_id == Some(owner_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Cannot act on another user's records".into(),
            ))
        }
    }
}
