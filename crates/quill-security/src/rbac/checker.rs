//! Role checks against token claims.
//!
//! Access is granted by exact membership of the caller's role in an
//! allow-set. Roles carry no hierarchy, so an admin-only set must name
//! `Role::Admin` explicitly and a member set must list every role it admits.

use crate::Claims;
use quill_core::{QuillError, QuillResult, Role, UserId};

/// Common allow-sets.
pub mod guards {
    use quill_core::Role;

    /// Administrators only.
    pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

    /// Any signed-in member.
    pub const ANY_MEMBER: &[Role] = &[Role::User, Role::Admin];
}

/// Extension trait for Claims to check roles.
pub trait ClaimsExt {
    /// Requires the caller's role to be one of `allowed`.
    fn require_any_role(&self, allowed: &[Role]) -> QuillResult<()>;

    /// Requires the caller to be `owner` or to hold one of `allowed`.
    fn require_self_or_any_role(&self, owner: UserId, allowed: &[Role]) -> QuillResult<()>;

    /// Checks if the token subject is `user_id`.
    fn is_subject(&self, user_id: UserId) -> bool;
}

impl ClaimsExt for Claims {
    fn require_any_role(&self, allowed: &[Role]) -> QuillResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(QuillError::unauthorized(format!(
                "role '{}' is not permitted",
                self.role
            )))
        }
    }

    fn require_self_or_any_role(&self, owner: UserId, allowed: &[Role]) -> QuillResult<()> {
        if self.is_subject(owner) {
            return Ok(());
        }
        self.require_any_role(allowed)
    }

    fn is_subject(&self, user_id: UserId) -> bool {
        self.sub == user_id
    }
}
