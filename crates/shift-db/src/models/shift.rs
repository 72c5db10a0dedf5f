//! Shift database model

use sqlx::FromRow;

/// Database model for the shifts table
#[derive(Debug, Clone, FromRow)]
pub struct ShiftModel {
    pub id: i64,
    pub user_id: i64,
    pub guild_id: i64,
    /// Epoch seconds; start of the current active interval
    pub start_ts: i64,
    pub pause_ts: Option<i64>,
    pub resume_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub total_seconds: i64,
    #[sqlx(rename = "type")]
    pub shift_type: String,
    /// Shift status: 'active', 'paused', 'ended'
    pub status: String,
}
