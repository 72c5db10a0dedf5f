//! LoA database model

use sqlx::FromRow;

/// Database model for the loa table
#[derive(Debug, Clone, FromRow)]
pub struct LoaModel {
    pub id: i64,
    pub user_id: i64,
    pub guild_id: i64,
    pub start_ts: i64,
    pub end_ts: i64,
    pub reason: String,
    /// Request status: 'pending', 'approved', 'denied'
    pub status: String,
    /// Admin who resolved the request; NULL while pending
    pub actor_id: Option<i64>,
}
