//! Shift ledger service
//!
//! Owns the shift state machine: start, pause, resume, end, force-end, the
//! admin bulk operations, and log retrieval. Authorization runs before any
//! mutation; the mutation itself is the store's atomic conditional update, so
//! a lost race surfaces as the same invalid-state error a stale caller would
//! get, never as a double-counted interval.

use tracing::{info, instrument, warn};

use shift_core::{
    AuditAction, AuditLogEntry, DomainError, Effect, Shift, ShiftId, ShiftStatus, Snowflake,
    DEFAULT_SHIFT_TYPE,
};

use crate::dto::{BulkFilterRequest, ShiftSnapshot, StartShiftRequest};

use super::access::{AccessPolicy, Actor};
use super::audit::AuditService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// A mutated shift plus the fire-and-forget effects it requests
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    pub snapshot: ShiftSnapshot,
    pub effects: Vec<Effect>,
}

/// Result of a bulk operation
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub processed: u64,
    pub effects: Vec<Effect>,
}

/// Shift ledger service
pub struct ShiftService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ShiftService<'a> {
    /// Create a new ShiftService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start a new shift.
    ///
    /// Always inserts a fresh active record; whether the caller already has
    /// an open shift is not checked here. `find_open` exists for surfaces
    /// that want to pre-check.
    #[instrument(skip(self, request))]
    pub async fn start(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        request: StartShiftRequest,
        via_button: bool,
    ) -> ServiceResult<ShiftOutcome> {
        let shift_type = request
            .shift_type
            .unwrap_or_else(|| DEFAULT_SHIFT_TYPE.to_string());
        let now = self.ctx.now();

        let shift = self
            .ctx
            .shift_repo()
            .create(actor.user_id, guild_id, &shift_type, now)
            .await?;

        info!(shift_id = %shift.id, user_id = %actor.user_id, "Shift started");

        let action = if via_button {
            AuditAction::ShiftStartButton
        } else {
            AuditAction::ShiftStart
        };
        AuditService::new(self.ctx)
            .record(
                shift.user_id,
                guild_id,
                actor.user_id,
                action,
                format!("id={},type={}", shift.id, shift.shift_type),
            )
            .await;

        let snapshot = ShiftSnapshot::from(&shift);
        let mut effects = Vec::new();
        effects.extend(self.grant_role_effect(guild_id, shift.user_id));
        effects.extend(self.broadcast_effect(snapshot.summary("started", actor.user_id)));

        Ok(ShiftOutcome { snapshot, effects })
    }

    /// Pause an active shift, rolling the open interval into the total.
    ///
    /// With an explicit id (button path) that row is the target; otherwise
    /// the caller's active shift in the guild is looked up.
    #[instrument(skip(self))]
    pub async fn pause(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        shift_id: Option<ShiftId>,
    ) -> ServiceResult<ShiftOutcome> {
        let via_button = shift_id.is_some();
        let target = match shift_id {
            Some(id) => self.require_shift(id).await?,
            None => self
                .ctx
                .shift_repo()
                .find_active(actor.user_id, guild_id)
                .await?
                .ok_or(DomainError::NoActiveShift)?,
        };

        AccessPolicy::from_context(self.ctx).require_owner_or_admin(actor, target.user_id)?;

        if target.status != ShiftStatus::Active {
            return Err(DomainError::ShiftNotActive {
                status: target.status,
            }
            .into());
        }

        let now = self.ctx.now();
        let updated = match self.ctx.shift_repo().pause(target.id, now).await? {
            Some(shift) => shift,
            None => {
                return Err(self
                    .conflict_error(target.id, |status| DomainError::ShiftNotActive { status })
                    .await)
            }
        };

        let action = if via_button {
            AuditAction::ShiftPauseButton
        } else {
            AuditAction::ShiftPause
        };
        AuditService::new(self.ctx)
            .record(
                updated.user_id,
                guild_id,
                actor.user_id,
                action,
                format!("id={}", updated.id),
            )
            .await;

        let snapshot = ShiftSnapshot::from(&updated);
        let effects = self
            .broadcast_effect(snapshot.summary("paused", actor.user_id))
            .into_iter()
            .collect();

        Ok(ShiftOutcome { snapshot, effects })
    }

    /// Resume a paused shift; the interval clock restarts at the resume
    /// instant so the pause gap never counts toward the total.
    #[instrument(skip(self))]
    pub async fn resume(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        shift_id: Option<ShiftId>,
    ) -> ServiceResult<ShiftOutcome> {
        let via_button = shift_id.is_some();
        let target = match shift_id {
            Some(id) => self.require_shift(id).await?,
            None => self
                .ctx
                .shift_repo()
                .find_paused(actor.user_id, guild_id)
                .await?
                .ok_or(DomainError::NoPausedShift)?,
        };

        AccessPolicy::from_context(self.ctx).require_owner_or_admin(actor, target.user_id)?;

        if target.status != ShiftStatus::Paused {
            return Err(DomainError::ShiftNotPaused {
                status: target.status,
            }
            .into());
        }

        let now = self.ctx.now();
        let updated = match self.ctx.shift_repo().resume(target.id, now).await? {
            Some(shift) => shift,
            None => {
                return Err(self
                    .conflict_error(target.id, |status| DomainError::ShiftNotPaused { status })
                    .await)
            }
        };

        let action = if via_button {
            AuditAction::ShiftResumeButton
        } else {
            AuditAction::ShiftResume
        };
        AuditService::new(self.ctx)
            .record(
                updated.user_id,
                guild_id,
                actor.user_id,
                action,
                format!("id={}", updated.id),
            )
            .await;

        let snapshot = ShiftSnapshot::from(&updated);
        let effects = self
            .broadcast_effect(snapshot.summary("resumed", actor.user_id))
            .into_iter()
            .collect();

        Ok(ShiftOutcome { snapshot, effects })
    }

    /// End a shift. Owners end their own; admins may end anyone's.
    #[instrument(skip(self))]
    pub async fn end(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        shift_id: Option<ShiftId>,
    ) -> ServiceResult<ShiftOutcome> {
        let via_button = shift_id.is_some();
        let target = match shift_id {
            Some(id) => self.require_shift(id).await?,
            None => self
                .ctx
                .shift_repo()
                .find_open(actor.user_id, guild_id)
                .await?
                .ok_or(DomainError::NoOpenShift)?,
        };

        AccessPolicy::from_context(self.ctx).require_owner_or_admin(actor, target.user_id)?;

        let action = if via_button {
            AuditAction::ShiftEndButton
        } else {
            AuditAction::ShiftEnd
        };
        self.close_shift(actor, guild_id, target, action, "ended").await
    }

    /// Force-end another member's shift. Admin only.
    ///
    /// Targets an explicit shift id when given, otherwise the target user's
    /// open shift in the guild.
    #[instrument(skip(self))]
    pub async fn force_end(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        shift_id: Option<ShiftId>,
        target_user_id: Option<Snowflake>,
    ) -> ServiceResult<ShiftOutcome> {
        AccessPolicy::from_context(self.ctx).require_admin(actor)?;

        let via_button = shift_id.is_some();
        let target = match (shift_id, target_user_id) {
            (Some(id), _) => self.require_shift(id).await?,
            (None, Some(user_id)) => self
                .ctx
                .shift_repo()
                .find_open(user_id, guild_id)
                .await?
                .ok_or(DomainError::NoOpenShift)?,
            (None, None) => {
                return Err(DomainError::ValidationError(
                    "Force-end needs a shift id or a target user".to_string(),
                )
                .into())
            }
        };

        let action = if via_button {
            AuditAction::ShiftForceEndButton
        } else {
            AuditAction::ShiftForceEnd
        };
        self.close_shift(actor, guild_id, target, action, "force ended")
            .await
    }

    /// End every open shift matching the filter. Admin only.
    ///
    /// Records are processed independently; one record failing does not stop
    /// the rest. Returns how many were ended.
    #[instrument(skip(self, request))]
    pub async fn bulk_end(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        request: BulkFilterRequest,
    ) -> ServiceResult<BulkOutcome> {
        AccessPolicy::from_context(self.ctx).require_admin(actor)?;

        let filter = request.into_filter(guild_id)?;
        let rows = self.ctx.shift_repo().find_open_matching(&filter).await?;

        let audit = AuditService::new(self.ctx);
        let mut processed = 0u64;
        let mut effects = Vec::new();

        for row in rows {
            let now = self.ctx.now();
            match self.ctx.shift_repo().end(row.id, now).await {
                Ok(Some(shift)) => {
                    processed += 1;
                    audit
                        .record(
                            shift.user_id,
                            guild_id,
                            actor.user_id,
                            AuditAction::ShiftBulkEnd,
                            format!("id={},total={}", shift.id, shift.total_seconds),
                        )
                        .await;
                    let snapshot = ShiftSnapshot::from(&shift);
                    effects.extend(self.revoke_role_effect(guild_id, shift.user_id));
                    effects.extend(
                        self.broadcast_effect(snapshot.summary("ended (admin bulk)", actor.user_id)),
                    );
                }
                // closed by someone else between select and update
                Ok(None) => {}
                Err(err) => {
                    warn!(shift_id = %row.id, error = %err, "bulk end: record skipped");
                }
            }
        }

        info!(processed, guild_id = %guild_id, "Bulk end finished");
        Ok(BulkOutcome { processed, effects })
    }

    /// Hard-delete every shift matching the filter, any status. Admin only.
    ///
    /// The filter must narrow beyond the guild; deleting a whole guild's
    /// history with an empty filter is rejected. Each deletion is logged
    /// individually; an empty match set deletes and logs nothing.
    #[instrument(skip(self, request))]
    pub async fn bulk_delete(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        request: BulkFilterRequest,
    ) -> ServiceResult<BulkOutcome> {
        AccessPolicy::from_context(self.ctx).require_admin(actor)?;

        let filter = request.into_filter(guild_id)?;
        if filter.is_unbounded() {
            return Err(DomainError::EmptyBulkFilter.into());
        }

        let rows = self.ctx.shift_repo().find_matching(&filter).await?;

        let audit = AuditService::new(self.ctx);
        let mut processed = 0u64;
        let mut effects = Vec::new();

        for row in rows {
            match self.ctx.shift_repo().delete(row.id).await {
                Ok(true) => {
                    processed += 1;
                    audit
                        .record(
                            row.user_id,
                            guild_id,
                            actor.user_id,
                            AuditAction::ShiftBulkDelete,
                            format!("id={}", row.id),
                        )
                        .await;
                    effects.extend(self.broadcast_effect(format!(
                        "Shift #{} deleted by {}",
                        row.id, actor.user_id
                    )));
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(shift_id = %row.id, error = %err, "bulk delete: record skipped");
                }
            }
        }

        info!(processed, guild_id = %guild_id, "Bulk delete finished");
        Ok(BulkOutcome { processed, effects })
    }

    /// The caller's audit trail, newest first
    #[instrument(skip(self))]
    pub async fn logs(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<AuditLogEntry>> {
        AuditService::new(self.ctx)
            .user_logs(actor.user_id, guild_id, limit)
            .await
    }

    /// The user's active or paused shift in the guild, if any
    #[instrument(skip(self))]
    pub async fn get_open(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> ServiceResult<Option<ShiftSnapshot>> {
        let shift = self.ctx.shift_repo().find_open(user_id, guild_id).await?;
        Ok(shift.as_ref().map(ShiftSnapshot::from))
    }

    /// A shift by id, if it exists
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: ShiftId) -> ServiceResult<Option<ShiftSnapshot>> {
        let shift = self.ctx.shift_repo().find_by_id(id).await?;
        Ok(shift.as_ref().map(ShiftSnapshot::from))
    }

    // === internals ===

    async fn require_shift(&self, id: ShiftId) -> ServiceResult<Shift> {
        Ok(self
            .ctx
            .shift_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ShiftNotFound(id))?)
    }

    /// Shared tail of end/force-end
    async fn close_shift(
        &self,
        actor: &Actor,
        guild_id: Snowflake,
        target: Shift,
        action: AuditAction,
        label: &str,
    ) -> ServiceResult<ShiftOutcome> {
        if !target.status.is_open() {
            return Err(DomainError::ShiftNotOpen {
                status: target.status,
            }
            .into());
        }

        let now = self.ctx.now();
        let updated = match self.ctx.shift_repo().end(target.id, now).await? {
            Some(shift) => shift,
            None => {
                return Err(self
                    .conflict_error(target.id, |status| DomainError::ShiftNotOpen { status })
                    .await)
            }
        };

        AuditService::new(self.ctx)
            .record(
                updated.user_id,
                guild_id,
                actor.user_id,
                action,
                format!("id={},total={}", updated.id, updated.total_seconds),
            )
            .await;

        let snapshot = ShiftSnapshot::from(&updated);
        let mut effects = Vec::new();
        effects.extend(self.revoke_role_effect(guild_id, updated.user_id));
        effects.extend(self.broadcast_effect(snapshot.summary(label, actor.user_id)));

        Ok(ShiftOutcome { snapshot, effects })
    }

    /// A conditional update matched no row: re-read to tell "gone" from
    /// "state changed underneath us"
    async fn conflict_error(
        &self,
        id: ShiftId,
        make: fn(ShiftStatus) -> DomainError,
    ) -> super::error::ServiceError {
        match self.ctx.shift_repo().find_by_id(id).await {
            Ok(Some(shift)) => make(shift.status).into(),
            Ok(None) => DomainError::ShiftNotFound(id).into(),
            Err(err) => err.into(),
        }
    }

    fn grant_role_effect(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Effect> {
        self.ctx
            .guard_rails()
            .shift_role_id
            .map(|role_id| Effect::GrantShiftRole {
                guild_id,
                user_id,
                role_id,
            })
    }

    fn revoke_role_effect(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Effect> {
        self.ctx
            .guard_rails()
            .shift_role_id
            .map(|role_id| Effect::RevokeShiftRole {
                guild_id,
                user_id,
                role_id,
            })
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
