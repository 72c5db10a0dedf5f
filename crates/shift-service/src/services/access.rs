//! Caller authorization
//!
//! A caller is admin when they hold the configured admin role or carry the
//! guild-management permission bit. Plain members may only act on rows they
//! own. Authorization runs before any ledger call, so a rejected caller never
//! mutates state.

use shift_core::{DomainError, Permissions, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Snapshot of the caller as reported by the chat platform
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Snowflake,
    pub role_ids: Vec<Snowflake>,
    pub permissions: Permissions,
}

impl Actor {
    /// Create an actor snapshot
    pub fn new(user_id: Snowflake, role_ids: Vec<Snowflake>, permissions: Permissions) -> Self {
        Self {
            user_id,
            role_ids,
            permissions,
        }
    }

    /// A plain member with no roles or permission bits
    pub fn member(user_id: Snowflake) -> Self {
        Self::new(user_id, Vec::new(), Permissions::empty())
    }
}

/// Evaluates admin rights and row ownership for a guild
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    admin_role_id: Option<Snowflake>,
}

impl AccessPolicy {
    pub fn new(admin_role_id: Option<Snowflake>) -> Self {
        Self { admin_role_id }
    }

    /// Policy from the context's guard rails
    pub fn from_context(ctx: &ServiceContext) -> Self {
        Self::new(ctx.guard_rails().admin_role_id)
    }

    /// Admin = configured admin role held OR guild-management permission bit
    pub fn is_admin(&self, actor: &Actor) -> bool {
        if actor.permissions.can_manage_guild() {
            return true;
        }
        self.admin_role_id
            .is_some_and(|role| actor.role_ids.contains(&role))
    }

    /// Reject non-admin callers
    pub fn require_admin(&self, actor: &Actor) -> ServiceResult<()> {
        if self.is_admin(actor) {
            Ok(())
        } else {
            Err(DomainError::AdminRequired.into())
        }
    }

    /// Owners act on their own rows; admins on anyone's
    pub fn require_owner_or_admin(&self, actor: &Actor, owner_id: Snowflake) -> ServiceResult<()> {
        if actor.user_id == owner_id || self.is_admin(actor) {
            Ok(())
        } else {
            Err(DomainError::NotShiftOwner.into())
        }
    }
}
