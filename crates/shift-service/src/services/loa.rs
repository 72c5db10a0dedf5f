//! LoA ledger service
//!
//! Leave requests resolve exactly once: the store's conditional update is
//! guarded on `pending`, so a second Approve/Deny loses the race and gets the
//! invalid-state error. The requester notification is an effect the embedding
//! layer delivers best-effort; its failure never reaches this ledger.

use tracing::{info, instrument};

use shift_core::{
    AuditAction, DomainError, Effect, LeaveDuration, Loa, LoaId, LoaStatus, Snowflake,
    DEFAULT_LOA_REASON,
};

use crate::dto::{LoaRequestInput, LoaSnapshot};

use super::access::{AccessPolicy, Actor};
use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;

const LIST_OWN_MAX_LIMIT: i64 = 50;
const LIST_GUILD_DEFAULT_LIMIT: i64 = 50;
const LIST_GUILD_MAX_LIMIT: i64 = 200;

/// A mutated leave request plus the effects it requests
#[derive(Debug, Clone)]
pub struct LoaOutcome {
    pub snapshot: LoaSnapshot,
    pub effects: Vec<Effect>,
}

/// LoA ledger service
pub struct LoaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LoaService<'a> {
    /// Create a new LoaService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a new leave request in pending state.
    ///
    /// The duration grammar is `<n>d`, `<n>w`, or a bare day count; an
    /// unparseable expression yields a zero-length range rather than an
    /// error.
    #[instrument(skip(self, input))]
    pub async fn request(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        input: LoaRequestInput,
    ) -> ServiceResult<LoaOutcome> {
        let start_ts = self.ctx.now();
        let end_ts = LeaveDuration::end_ts(start_ts, &input.duration);
        let reason = input
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOA_REASON.to_string());

        let loa = self
            .ctx
            .loa_repo()
            .create(actor.user_id, guild_id, start_ts, end_ts, &reason)
            .await?;

        info!(loa_id = %loa.id, user_id = %actor.user_id, "LoA requested");

        AuditService::new(self.ctx)
            .record(
                loa.user_id,
                guild_id,
                actor.user_id,
                AuditAction::LoaRequest,
                format!("id={},reason={}", loa.id, loa.reason),
            )
            .await;

        let snapshot = LoaSnapshot::from(&loa);
        let effects = self
            .broadcast_effect(snapshot.summary("requested", actor.user_id))
            .into_iter()
            .collect();

        Ok(LoaOutcome { snapshot, effects })
    }

    /// Approve a pending request. Admin only.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        id: LoaId,
        note: Option<String>,
    ) -> ServiceResult<LoaOutcome> {
        self.resolve(actor, guild_id, id, LoaStatus::Approved, note)
            .await
    }

    /// Deny a pending request. Admin only.
    #[instrument(skip(self))]
    pub async fn deny(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        id: LoaId,
        note: Option<String>,
    ) -> ServiceResult<LoaOutcome> {
        self.resolve(actor, guild_id, id, LoaStatus::Denied, note)
            .await
    }

    /// The caller's own requests, newest first; limit clamped to 1..=50
    #[instrument(skip(self))]
    pub async fn list_own(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<LoaSnapshot>> {
        let limit = limit
            .unwrap_or(LIST_OWN_MAX_LIMIT)
            .clamp(1, LIST_OWN_MAX_LIMIT);
        let rows = self
            .ctx
            .loa_repo()
            .list_for_user(actor.user_id, guild_id, limit)
            .await?;
        Ok(rows.iter().map(LoaSnapshot::from).collect())
    }

    /// All requests in the guild, newest first. Admin only; limit clamped to
    /// 1..=200 with a default of 50.
    #[instrument(skip(self))]
    pub async fn list_guild(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<LoaSnapshot>> {
        AccessPolicy::from_context(self.ctx).require_admin(actor)?;

        let limit = limit
            .unwrap_or(LIST_GUILD_DEFAULT_LIMIT)
            .clamp(1, LIST_GUILD_MAX_LIMIT);
        let rows = self.ctx.loa_repo().list_for_guild(guild_id, limit).await?;
        Ok(rows.iter().map(LoaSnapshot::from).collect())
    }

    /// The caller's most recent request
    #[instrument(skip(self))]
    pub async fn latest_status(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
    ) -> ServiceResult<LoaSnapshot> {
        let loa = self
            .ctx
            .loa_repo()
            .latest_for_user(actor.user_id, guild_id)
            .await?
            .ok_or(DomainError::NoLoaRecord)?;
        Ok(LoaSnapshot::from(&loa))
    }

    // === internals ===

    async fn resolve(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        id: LoaId,
        decision: LoaStatus,
        note: Option<String>,
    ) -> ServiceResult<LoaOutcome> {
        AccessPolicy::from_context(self.ctx).require_admin(actor)?;

        let target = self
            .ctx
            .loa_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::LoaNotFound(id))?;

        if target.status.is_resolved() {
            return Err(DomainError::LoaAlreadyResolved {
                status: target.status,
            }
            .into());
        }

        let updated = match self.ctx.loa_repo().resolve(id, decision, actor.user_id).await? {
            Some(loa) => loa,
            // resolved by another admin between read and update
            None => return Err(self.conflict_error(id).await),
        };

        info!(loa_id = %id, decision = %decision, "LoA resolved");

        let (action, verb) = match decision {
            LoaStatus::Approved => (AuditAction::LoaApprove, "approved"),
            _ => (AuditAction::LoaDeny, "denied"),
        };
        AuditService::new(self.ctx)
            .record(
                updated.user_id,
                guild_id,
                actor.user_id,
                action,
                format!("id={},note={}", id, note.unwrap_or_default()),
            )
            .await;

        let snapshot = LoaSnapshot::from(&updated);
        let mut effects = vec![Effect::NotifyUser {
            user_id: updated.user_id,
            message: format!("Your LoA (ID: {id}) was {verb}."),
        }];
        effects.extend(self.broadcast_effect(snapshot.summary(verb, actor.user_id)));

        Ok(LoaOutcome { snapshot, effects })
    }

    async fn conflict_error(&self, id: LoaId) -> super::error::ServiceError {
        match self.ctx.loa_repo().find_by_id(id).await {
            Ok(Some(Loa { status, .. })) => DomainError::LoaAlreadyResolved { status }.into(),
            Ok(None) => DomainError::LoaNotFound(id).into(),
            Err(err) => err.into(),
        }
    }

    fn broadcast_effect(&self, summary: String) -> Option<Effect> {
        self.ctx
            .guard_rails()
            .log_channel_id
            .map(|channel_id| Effect::Broadcast {
                channel_id,
                summary,
            })
    }
}
