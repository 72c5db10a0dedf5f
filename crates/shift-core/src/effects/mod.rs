//! Side-effect descriptions returned alongside ledger mutations
//!
//! The ledger itself never talks to the chat platform. Operations return
//! `Effect` values describing what the embedding layer should do next; all of
//! them are best-effort and a failed effect must not be reported back as a
//! failure of the mutation that produced it.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Fire-and-forget external action requested by a ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Grant the configured on-shift role to a member
    GrantShiftRole {
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    },
    /// Revoke the configured on-shift role from a member
    RevokeShiftRole {
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    },
    /// Direct-message a user
    NotifyUser { user_id: Snowflake, message: String },
    /// Post a summary line to the configured audit channel
    Broadcast {
        channel_id: Snowflake,
        summary: String,
    },
}

impl Effect {
    /// Short tag for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GrantShiftRole { .. } => "grant_shift_role",
            Self::RevokeShiftRole { .. } => "revoke_shift_role",
            Self::NotifyUser { .. } => "notify_user",
            Self::Broadcast { .. } => "broadcast",
        }
    }
}
