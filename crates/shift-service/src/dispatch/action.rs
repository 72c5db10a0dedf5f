//! Structured actions
//!
//! Component interactions used to arrive as composite id strings parsed back
//! into action + record id; here the surface constructs a typed value
//! instead, so a malformed identifier cannot reach the ledgers.

use shift_core::{LoaId, ShiftId, Snowflake};

use crate::dto::{BulkFilterRequest, LoaRequestInput, StartShiftRequest};
use crate::services::Actor;

/// One incoming interaction: who is asking, where, and what for
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub actor: Actor,
    pub guild_id: Snowflake,
    pub action: Action,
}

/// Everything the command and button surfaces can ask of the ledgers.
///
/// Shift actions carry an optional explicit id: buttons know which record
/// they belong to, slash commands resolve the caller's open shift instead.
#[derive(Debug, Clone)]
pub enum Action {
    ShiftStart {
        request: StartShiftRequest,
        via_button: bool,
    },
    ShiftPause {
        shift_id: Option<ShiftId>,
    },
    ShiftResume {
        shift_id: Option<ShiftId>,
    },
    ShiftEnd {
        shift_id: Option<ShiftId>,
    },
    ShiftForceEnd {
        shift_id: Option<ShiftId>,
        target_user_id: Option<Snowflake>,
    },
    ShiftBulkEnd {
        filter: BulkFilterRequest,
    },
    ShiftBulkDelete {
        filter: BulkFilterRequest,
    },
    ShiftLogs {
        limit: Option<i64>,
    },
    LoaRequest {
        input: LoaRequestInput,
    },
    LoaList {
        limit: Option<i64>,
    },
    LoaStatus,
    LoaApprove {
        id: LoaId,
        note: Option<String>,
    },
    LoaDeny {
        id: LoaId,
        note: Option<String>,
    },
    LoaListAll {
        limit: Option<i64>,
    },
}
