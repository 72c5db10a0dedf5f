//! Command dispatch - the façade between the interaction surface and the
//! ledgers
//!
//! Incoming work arrives as a structured [`Action`] (never a string to be
//! re-parsed), is validated, authorized, and routed to the matching service.
//! Every outcome carries a reply payload for rendering plus the list of
//! fire-and-forget effects the embedding layer should execute. The outer
//! boundary converts any error into a caller-facing message so one bad
//! request can never tear down the processing stream.

mod action;

pub use action::{Action, ActionRequest};

use tracing::{instrument, warn};
use validator::Validate;

use shift_core::Effect;

use crate::dto::{LoaSnapshot, ShiftSnapshot};
use crate::services::{
    LoaService, ServiceContext, ServiceError, ServiceResult, ShiftService,
};

/// Reply payload handed to the rendering layer
#[derive(Debug, Clone)]
pub enum Reply {
    /// A shift record to render
    Shift(ShiftSnapshot),
    /// A leave request to render
    Loa(LoaSnapshot),
    /// Pre-rendered plain-text listing
    Listing(String),
    /// Count of records a bulk operation touched
    Processed(u64),
    /// Caller-facing failure message
    Error(String),
}

/// Result of handling one action
#[derive(Debug, Clone)]
pub struct Outcome {
    pub reply: Reply,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn reply_only(reply: Reply) -> Self {
        Self {
            reply,
            effects: Vec::new(),
        }
    }
}

/// Routes actions to the ledgers
pub struct Dispatcher {
    ctx: ServiceContext,
}

impl Dispatcher {
    /// Create a new Dispatcher
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one action. Never fails: every error becomes a caller-facing
    /// `Reply::Error` with no effects attached.
    #[instrument(skip(self, request), fields(guild_id = %request.guild_id, actor = %request.actor.user_id))]
    pub async fn handle(&self, request: ActionRequest) -> Outcome {
        match self.dispatch(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "action failed");
                Outcome::reply_only(Reply::Error(err.user_message()))
            }
        }
    }

    async fn dispatch(&self, request: ActionRequest) -> ServiceResult<Outcome> {
        let ActionRequest {
            actor,
            guild_id,
            action,
        } = request;

        let shifts = ShiftService::new(&self.ctx);
        let loa = LoaService::new(&self.ctx);

        match action {
            Action::ShiftStart {
                request,
                via_button,
            } => {
                request.validate().map_err(ServiceError::from)?;
                let outcome = shifts.start(&actor, guild_id, request, via_button).await?;
                Ok(Outcome {
                    reply: Reply::Shift(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::ShiftPause { shift_id } => {
                let outcome = shifts.pause(&actor, guild_id, shift_id).await?;
                Ok(Outcome {
                    reply: Reply::Shift(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::ShiftResume { shift_id } => {
                let outcome = shifts.resume(&actor, guild_id, shift_id).await?;
                Ok(Outcome {
                    reply: Reply::Shift(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::ShiftEnd { shift_id } => {
                let outcome = shifts.end(&actor, guild_id, shift_id).await?;
                Ok(Outcome {
                    reply: Reply::Shift(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::ShiftForceEnd {
                shift_id,
                target_user_id,
            } => {
                let outcome = shifts
                    .force_end(&actor, guild_id, shift_id, target_user_id)
                    .await?;
                Ok(Outcome {
                    reply: Reply::Shift(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::ShiftBulkEnd { filter } => {
                filter.validate().map_err(ServiceError::from)?;
                let outcome = shifts.bulk_end(&actor, guild_id, filter).await?;
                Ok(Outcome {
                    reply: Reply::Processed(outcome.processed),
                    effects: outcome.effects,
                })
            }
            Action::ShiftBulkDelete { filter } => {
                filter.validate().map_err(ServiceError::from)?;
                let outcome = shifts.bulk_delete(&actor, guild_id, filter).await?;
                Ok(Outcome {
                    reply: Reply::Processed(outcome.processed),
                    effects: outcome.effects,
                })
            }
            Action::ShiftLogs { limit } => {
                let entries = shifts.logs(&actor, guild_id, limit).await?;
                let listing = entries
                    .iter()
                    .map(shift_core::AuditLogEntry::render_line)
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(Outcome::reply_only(Reply::Listing(listing)))
            }
            Action::LoaRequest { input } => {
                input.validate().map_err(ServiceError::from)?;
                let outcome = loa.request(&actor, guild_id, input).await?;
                Ok(Outcome {
                    reply: Reply::Loa(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::LoaList { limit } => {
                let rows = loa.list_own(&actor, guild_id, limit).await?;
                Ok(Outcome::reply_only(Reply::Listing(render_loa_listing(&rows))))
            }
            Action::LoaStatus => {
                let snapshot = loa.latest_status(&actor, guild_id).await?;
                Ok(Outcome::reply_only(Reply::Loa(snapshot)))
            }
            Action::LoaApprove { id, note } => {
                let outcome = loa.approve(&actor, guild_id, id, note).await?;
                Ok(Outcome {
                    reply: Reply::Loa(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::LoaDeny { id, note } => {
                let outcome = loa.deny(&actor, guild_id, id, note).await?;
                Ok(Outcome {
                    reply: Reply::Loa(outcome.snapshot),
                    effects: outcome.effects,
                })
            }
            Action::LoaListAll { limit } => {
                let rows = loa.list_guild(&actor, guild_id, limit).await?;
                Ok(Outcome::reply_only(Reply::Listing(render_loa_listing(&rows))))
            }
        }
    }
}

fn render_loa_listing(rows: &[LoaSnapshot]) -> String {
    rows.iter()
        .map(LoaSnapshot::render_line)
        .collect::<Vec<_>>()
        .join("\n")
}
