//! PostgreSQL implementation of LoaRepository
//!
//! Resolution is guarded by `WHERE status = 'pending'`; a request resolves
//! exactly once even under concurrent Approve/Deny calls.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use shift_core::{Loa, LoaId, LoaRepository, LoaStatus, RepoResult, Snowflake};

use crate::models::LoaModel;

use super::error::map_db_error;

const LOA_COLUMNS: &str = "id, user_id, guild_id, start_ts, end_ts, reason, status, actor_id";

/// PostgreSQL implementation of LoaRepository
#[derive(Clone)]
pub struct PgLoaRepository {
    pool: PgPool,
}

impl PgLoaRepository {
    /// Create a new PgLoaRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Convert database status string to LoaStatus; anything unknown reads as
/// denied, the inert state
fn parse_status(status: &str) -> LoaStatus {
    LoaStatus::parse(status).unwrap_or(LoaStatus::Denied)
}

impl From<LoaModel> for Loa {
    fn from(model: LoaModel) -> Self {
        Loa {
            id: LoaId::new(model.id),
            user_id: Snowflake::new(model.user_id),
            guild_id: Snowflake::new(model.guild_id),
            start_ts: model.start_ts,
            end_ts: model.end_ts,
            reason: model.reason,
            status: parse_status(&model.status),
            actor_id: model.actor_id.map(Snowflake::new),
        }
    }
}

#[async_trait]
impl LoaRepository for PgLoaRepository {
    #[instrument(skip(self, reason))]
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        start_ts: i64,
        end_ts: i64,
        reason: &str,
    ) -> RepoResult<Loa> {
        let model = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            INSERT INTO loa (user_id, guild_id, start_ts, end_ts, reason, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {LOA_COLUMNS}
            "
        ))
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .bind(start_ts)
        .bind(end_ts)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Loa::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: LoaId) -> RepoResult<Option<Loa>> {
        let result = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            SELECT {LOA_COLUMNS}
            FROM loa
            WHERE id = $1
            "
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Loa::from))
    }

    #[instrument(skip(self))]
    async fn resolve(
        &self,
        id: LoaId,
        decision: LoaStatus,
        actor_id: Snowflake,
    ) -> RepoResult<Option<Loa>> {
        let result = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            UPDATE loa
            SET status = $2, actor_id = $3
            WHERE id = $1 AND status = 'pending'
            RETURNING {LOA_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(decision.as_str())
        .bind(actor_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Loa::from))
    }

    #[instrument(skip(self))]
    async fn list_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<Loa>> {
        let results = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            SELECT {LOA_COLUMNS}
            FROM loa
            WHERE user_id = $1 AND guild_id = $2
            ORDER BY id DESC
            LIMIT $3
            "
        ))
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Loa::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_guild(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<Loa>> {
        let results = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            SELECT {LOA_COLUMNS}
            FROM loa
            WHERE guild_id = $1
            ORDER BY id DESC
            LIMIT $2
            "
        ))
        .bind(guild_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Loa::from).collect())
    }

    #[instrument(skip(self))]
    async fn latest_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Loa>> {
        let result = sqlx::query_as::<_, LoaModel>(&format!(
            r"
            SELECT {LOA_COLUMNS}
            FROM loa
            WHERE user_id = $1 AND guild_id = $2
            ORDER BY id DESC
            LIMIT 1
            "
        ))
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Loa::from))
    }
}
