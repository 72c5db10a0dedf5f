//! Snapshot DTOs handed to the rendering layer
//!
//! All snapshots implement `Serialize`; snowflakes serialize as strings for
//! JavaScript compatibility (inherited from the id type itself).

use serde::Serialize;

use shift_core::{Loa, LoaId, LoaStatus, Shift, ShiftId, ShiftStatus, Snowflake};

/// Render seconds as `1h 2m 3s`
pub fn format_duration(mut secs: i64) -> String {
    secs = secs.max(0);
    let h = secs / 3600;
    secs %= 3600;
    let m = secs / 60;
    let s = secs % 60;
    format!("{h}h {m}m {s}s")
}

/// Point-in-time view of a shift record for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ShiftSnapshot {
    pub id: ShiftId,
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub shift_type: String,
    pub status: ShiftStatus,
    pub start_ts: i64,
    pub pause_ts: Option<i64>,
    pub resume_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub total_seconds: i64,
}

impl ShiftSnapshot {
    /// Accumulated total rendered as `1h 2m 3s`
    pub fn total_human(&self) -> String {
        format_duration(self.total_seconds)
    }

    /// Summary line for audit-channel broadcasts
    pub fn summary(&self, action_label: &str, actor_id: Snowflake) -> String {
        format!(
            "Shift #{} ({}) {} by {} | total: {}",
            self.id,
            self.shift_type,
            action_label,
            actor_id,
            self.total_human()
        )
    }
}

impl From<&Shift> for ShiftSnapshot {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            user_id: shift.user_id,
            guild_id: shift.guild_id,
            shift_type: shift.shift_type.clone(),
            status: shift.status,
            start_ts: shift.start_ts,
            pause_ts: shift.pause_ts,
            resume_ts: shift.resume_ts,
            end_ts: shift.end_ts,
            total_seconds: shift.total_seconds,
        }
    }
}

/// Point-in-time view of a leave request for rendering
#[derive(Debug, Clone, Serialize)]
pub struct LoaSnapshot {
    pub id: LoaId,
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub start_ts: i64,
    pub end_ts: i64,
    pub reason: String,
    pub status: LoaStatus,
    pub actor_id: Option<Snowflake>,
}

impl LoaSnapshot {
    /// One-line rendering for listings
    pub fn render_line(&self) -> String {
        format!(
            "ID:{} | U:{} | {} | {} | {} - {}",
            self.id, self.user_id, self.status, self.reason, self.start_ts, self.end_ts
        )
    }

    /// Summary line for audit-channel broadcasts
    pub fn summary(&self, action_label: &str, actor_id: Snowflake) -> String {
        format!("LoA #{} {} by {}", self.id, action_label, actor_id)
    }
}

impl From<&Loa> for LoaSnapshot {
    fn from(loa: &Loa) -> Self {
        Self {
            id: loa.id,
            user_id: loa.user_id,
            guild_id: loa.guild_id,
            start_ts: loa.start_ts,
            end_ts: loa.end_ts,
            reason: loa.reason.clone(),
            status: loa.status,
            actor_id: loa.actor_id,
        }
    }
}
