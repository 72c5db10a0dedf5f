//! Audit service
//!
//! Appends action records and serves the `/shift logs` listing. An append
//! failure is logged and swallowed: audit logging never blocks or fails the
//! operation it accompanies.

use tracing::{instrument, warn};

use shift_core::{AuditAction, AuditLogEntry, AuditQuery, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

const LOGS_DEFAULT_LIMIT: i64 = 20;
const LOGS_MAX_LIMIT: i64 = 100;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append one entry. Never raises; a failed write surfaces only as a
    /// warning.
    #[instrument(skip(self, data))]
    pub async fn record(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        actor_id: Snowflake,
        action: AuditAction,
        data: String,
    ) {
        let ts = self.ctx.now();
        if let Err(err) = self
            .ctx
            .audit_repo()
            .append(user_id, guild_id, actor_id, action.as_str(), &data, ts)
            .await
        {
            warn!(error = %err, action = %action, "audit append failed");
        }
    }

    /// Entries for a user in a guild, newest first. The limit is clamped to
    /// 1..=100 with a default of 20.
    #[instrument(skip(self))]
    pub async fn user_logs(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<AuditLogEntry>> {
        let query = AuditQuery {
            user_id,
            guild_id,
            limit: limit.unwrap_or(LOGS_DEFAULT_LIMIT).clamp(1, LOGS_MAX_LIMIT),
        };
        Ok(self.ctx.audit_repo().query(&query).await?)
    }
}
