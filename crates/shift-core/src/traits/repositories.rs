//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The conditional transition methods
//! (`pause`/`resume`/`end`/`resolve`) return `Ok(None)` when the row exists
//! but is not in the required state - the store must apply the state check
//! and the mutation in one atomic step so concurrent calls on the same row
//! cannot both succeed.

use async_trait::async_trait;

use crate::entities::{AuditLogEntry, Loa, LoaStatus, Shift};
use crate::error::DomainError;
use crate::value_objects::{LoaId, ShiftId, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Shift Repository
// ============================================================================

/// Selection filter for bulk shift operations
#[derive(Debug, Clone, Default)]
pub struct BulkShiftFilter {
    pub guild_id: Snowflake,
    pub user_id: Option<Snowflake>,
    /// Matches rows with `start_ts` strictly before this instant
    pub before_ts: Option<i64>,
    /// Explicit id list, intersected with the other criteria
    pub ids: Option<Vec<ShiftId>>,
}

impl BulkShiftFilter {
    /// A filter with no criteria beyond the guild matches everything in it
    pub fn is_unbounded(&self) -> bool {
        self.user_id.is_none() && self.before_ts.is_none() && self.ids.is_none()
    }
}

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Insert a new active shift and return it with its assigned id
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        shift_type: &str,
        start_ts: i64,
    ) -> RepoResult<Shift>;

    /// Find shift by id
    async fn find_by_id(&self, id: ShiftId) -> RepoResult<Option<Shift>>;

    /// The caller's active shift in this guild, if any
    async fn find_active(&self, user_id: Snowflake, guild_id: Snowflake)
        -> RepoResult<Option<Shift>>;

    /// The caller's paused shift in this guild, if any
    async fn find_paused(&self, user_id: Snowflake, guild_id: Snowflake)
        -> RepoResult<Option<Shift>>;

    /// The caller's active or paused shift in this guild, if any
    async fn find_open(&self, user_id: Snowflake, guild_id: Snowflake)
        -> RepoResult<Option<Shift>>;

    /// Atomically close the open interval and move active -> paused.
    /// `Ok(None)` when the row is missing or not active.
    async fn pause(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>>;

    /// Atomically move paused -> active, restarting the interval clock.
    /// `Ok(None)` when the row is missing or not paused.
    async fn resume(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>>;

    /// Atomically terminate an open shift, rolling in the open interval when
    /// the row was active. `Ok(None)` when the row is missing or already ended.
    async fn end(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>>;

    /// All open (active or paused) shifts matching the filter
    async fn find_open_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>>;

    /// All shifts matching the filter, regardless of status
    async fn find_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>>;

    /// Hard-delete a shift; `false` when no row existed
    async fn delete(&self, id: ShiftId) -> RepoResult<bool>;
}

// ============================================================================
// LoA Repository
// ============================================================================

#[async_trait]
pub trait LoaRepository: Send + Sync {
    /// Insert a new pending request and return it with its assigned id
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        start_ts: i64,
        end_ts: i64,
        reason: &str,
    ) -> RepoResult<Loa>;

    /// Find request by id
    async fn find_by_id(&self, id: LoaId) -> RepoResult<Option<Loa>>;

    /// Atomically record the admin decision on a pending request.
    /// `Ok(None)` when the row is missing or already resolved.
    async fn resolve(
        &self,
        id: LoaId,
        decision: LoaStatus,
        actor_id: Snowflake,
    ) -> RepoResult<Option<Loa>>;

    /// A user's requests in a guild, newest first
    async fn list_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<Loa>>;

    /// All requests in a guild, newest first
    async fn list_for_guild(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<Loa>>;

    /// The user's most recent request in a guild
    async fn latest_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Loa>>;
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Query options for audit log retrieval
#[derive(Debug, Clone)]
pub struct AuditQuery {
    pub user_id: Snowflake,
    pub guild_id: Snowflake,
    pub limit: i64,
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry. Failures propagate here; the service layer decides
    /// that audit writes never fail the primary operation.
    #[allow(clippy::too_many_arguments)]
    async fn append(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        actor_id: Snowflake,
        action: &str,
        data: &str,
        ts: i64,
    ) -> RepoResult<()>;

    /// Entries for a user in a guild, newest first
    async fn query(&self, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>>;
}
