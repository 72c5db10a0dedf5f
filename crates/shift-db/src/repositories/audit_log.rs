//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use shift_core::{AuditLogEntry, AuditLogRepository, AuditQuery, RepoResult, Snowflake};

use crate::models::AuditLogModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new PgAuditLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<AuditLogModel> for AuditLogEntry {
    fn from(model: AuditLogModel) -> Self {
        AuditLogEntry {
            id: model.id,
            user_id: Snowflake::new(model.user_id),
            guild_id: Snowflake::new(model.guild_id),
            actor_id: Snowflake::new(model.actor_id),
            action: model.action,
            data: model.data,
            ts: model.ts,
        }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self, data))]
    async fn append(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        actor_id: Snowflake,
        action: &str,
        data: &str,
        ts: i64,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO logs (user_id, guild_id, actor_id, action, data, ts)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .bind(actor_id.into_inner())
        .bind(action)
        .bind(data)
        .bind(ts)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn query(&self, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>> {
        let results = sqlx::query_as::<_, AuditLogModel>(
            r"
            SELECT id, user_id, guild_id, actor_id, action, data, ts
            FROM logs
            WHERE user_id = $1 AND guild_id = $2
            ORDER BY ts DESC, id DESC
            LIMIT $3
            ",
        )
        .bind(query.user_id.into_inner())
        .bind(query.guild_id.into_inner())
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AuditLogEntry::from).collect())
    }
}
