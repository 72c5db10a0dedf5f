//! PostgreSQL implementation of ShiftRepository
//!
//! State transitions are single conditional updates. The `WHERE status = ...`
//! guard plus `RETURNING *` makes each transition atomic: of two concurrent
//! Pause calls on the same row, exactly one matches the guard, so the open
//! interval is rolled into `total_seconds` exactly once.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use shift_core::{
    BulkShiftFilter, RepoResult, Shift, ShiftId, ShiftRepository, ShiftStatus, Snowflake,
};

use crate::models::ShiftModel;

use super::error::map_db_error;

const SHIFT_COLUMNS: &str =
    "id, user_id, guild_id, start_ts, pause_ts, resume_ts, end_ts, total_seconds, type, status";

/// PostgreSQL implementation of ShiftRepository
#[derive(Clone)]
pub struct PgShiftRepository {
    pool: PgPool,
}

impl PgShiftRepository {
    /// Create a new PgShiftRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_by_status(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        statuses: &[ShiftStatus],
    ) -> RepoResult<Option<Shift>> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        let result = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE user_id = $1 AND guild_id = $2 AND status = ANY($3)
            ORDER BY id DESC
            LIMIT 1
            "
        ))
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .bind(&statuses)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Shift::from))
    }
}

/// Convert database status string to ShiftStatus; anything unknown reads as
/// ended, the inert state
fn parse_status(status: &str) -> ShiftStatus {
    ShiftStatus::parse(status).unwrap_or(ShiftStatus::Ended)
}

impl From<ShiftModel> for Shift {
    fn from(model: ShiftModel) -> Self {
        Shift {
            id: ShiftId::new(model.id),
            user_id: Snowflake::new(model.user_id),
            guild_id: Snowflake::new(model.guild_id),
            shift_type: model.shift_type,
            status: parse_status(&model.status),
            start_ts: model.start_ts,
            pause_ts: model.pause_ts,
            resume_ts: model.resume_ts,
            end_ts: model.end_ts,
            total_seconds: model.total_seconds,
        }
    }
}

#[async_trait]
impl ShiftRepository for PgShiftRepository {
    #[instrument(skip(self))]
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        shift_type: &str,
        start_ts: i64,
    ) -> RepoResult<Shift> {
        let model = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            INSERT INTO shifts (user_id, guild_id, start_ts, total_seconds, type, status)
            VALUES ($1, $2, $3, 0, $4, 'active')
            RETURNING {SHIFT_COLUMNS}
            "
        ))
        .bind(user_id.into_inner())
        .bind(guild_id.into_inner())
        .bind(start_ts)
        .bind(shift_type)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Shift::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ShiftId) -> RepoResult<Option<Shift>> {
        let result = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE id = $1
            "
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Shift::from))
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        self.find_one_by_status(user_id, guild_id, &[ShiftStatus::Active])
            .await
    }

    #[instrument(skip(self))]
    async fn find_paused(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        self.find_one_by_status(user_id, guild_id, &[ShiftStatus::Paused])
            .await
    }

    #[instrument(skip(self))]
    async fn find_open(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        self.find_one_by_status(user_id, guild_id, &[ShiftStatus::Active, ShiftStatus::Paused])
            .await
    }

    #[instrument(skip(self))]
    async fn pause(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        let result = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            UPDATE shifts
            SET pause_ts = $2,
                total_seconds = total_seconds + GREATEST(0, $2 - start_ts),
                status = 'paused'
            WHERE id = $1 AND status = 'active'
            RETURNING {SHIFT_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Shift::from))
    }

    #[instrument(skip(self))]
    async fn resume(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        let result = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            UPDATE shifts
            SET resume_ts = $2,
                start_ts = $2,
                status = 'active'
            WHERE id = $1 AND status = 'paused'
            RETURNING {SHIFT_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Shift::from))
    }

    #[instrument(skip(self))]
    async fn end(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        let result = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            UPDATE shifts
            SET end_ts = $2,
                total_seconds = total_seconds
                    + CASE WHEN status = 'active' THEN GREATEST(0, $2 - start_ts) ELSE 0 END,
                status = 'ended'
            WHERE id = $1 AND status IN ('active', 'paused')
            RETURNING {SHIFT_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Shift::from))
    }

    #[instrument(skip(self))]
    async fn find_open_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>> {
        let ids = filter
            .ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.into_inner()).collect::<Vec<i64>>());
        let results = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE guild_id = $1
              AND status IN ('active', 'paused')
              AND ($2::BIGINT IS NULL OR user_id = $2)
              AND ($3::BIGINT IS NULL OR start_ts < $3)
              AND ($4::BIGINT[] IS NULL OR id = ANY($4))
            ORDER BY id
            "
        ))
        .bind(filter.guild_id.into_inner())
        .bind(filter.user_id.map(Snowflake::into_inner))
        .bind(filter.before_ts)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Shift::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>> {
        let ids = filter
            .ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.into_inner()).collect::<Vec<i64>>());
        let results = sqlx::query_as::<_, ShiftModel>(&format!(
            r"
            SELECT {SHIFT_COLUMNS}
            FROM shifts
            WHERE guild_id = $1
              AND ($2::BIGINT IS NULL OR user_id = $2)
              AND ($3::BIGINT IS NULL OR start_ts < $3)
              AND ($4::BIGINT[] IS NULL OR id = ANY($4))
            ORDER BY id
            "
        ))
        .bind(filter.guild_id.into_inner())
        .bind(filter.user_id.map(Snowflake::into_inner))
        .bind(filter.before_ts)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Shift::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ShiftId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM shifts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
