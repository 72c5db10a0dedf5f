//! Audit log entry and the action taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Tags recorded in the `action` column.
///
/// The `*Button` variants mark actions that arrived with an explicit shift id
/// (component interaction) rather than through open-shift lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ShiftStart,
    ShiftStartButton,
    ShiftPause,
    ShiftPauseButton,
    ShiftResume,
    ShiftResumeButton,
    ShiftEnd,
    ShiftEndButton,
    ShiftForceEnd,
    ShiftForceEndButton,
    ShiftBulkEnd,
    ShiftBulkDelete,
    LoaRequest,
    LoaApprove,
    LoaDeny,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShiftStart => "shift_start",
            Self::ShiftStartButton => "shift_start_button",
            Self::ShiftPause => "shift_pause",
            Self::ShiftPauseButton => "shift_pause_button",
            Self::ShiftResume => "shift_resume",
            Self::ShiftResumeButton => "shift_resume_button",
            Self::ShiftEnd => "shift_end",
            Self::ShiftEndButton => "shift_end_button",
            Self::ShiftForceEnd => "shift_forceend",
            Self::ShiftForceEndButton => "shift_forceend_button",
            Self::ShiftBulkEnd => "shift_bulk_end",
            Self::ShiftBulkDelete => "shift_bulk_delete",
            Self::LoaRequest => "loa_request",
            Self::LoaApprove => "loa_approve",
            Self::LoaDeny => "loa_deny",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded action. Append-only; `action` stays a free string on the read
/// side so unknown historical tags still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    /// Subject of the action
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    /// Who performed it; equals `user_id` for self-service actions
    pub actor_id: Snowflake,
    pub action: String,
    pub data: String,
    pub ts: i64,
}

impl AuditLogEntry {
    /// One-line rendering for the `/shift logs` listing
    pub fn render_line(&self) -> String {
        format!(
            "{} | {} | by: {} | {}",
            self.ts, self.action, self.actor_id, self.data
        )
    }
}
