//! Audit log database model

use sqlx::FromRow;

/// Database model for the logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub user_id: i64,
    pub guild_id: i64,
    pub actor_id: i64,
    pub action: String,
    pub data: String,
    pub ts: i64,
}
