//! In-memory store and clock fixtures
//!
//! The repositories hold rows behind a mutex and run each conditional
//! transition entirely under the lock, matching the atomicity the PostgreSQL
//! layer gets from single conditional updates. Failure injection hooks let
//! tests exercise the swallow-and-continue paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use shift_core::{
    AuditLogEntry, AuditLogRepository, AuditQuery, BulkShiftFilter, Clock, DomainError, Loa,
    LoaId, LoaRepository, LoaStatus, RepoResult, Shift, ShiftId, ShiftRepository, ShiftStatus,
    Snowflake,
};

/// Clock that only moves when a test says so
#[derive(Debug)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Shift store
// ============================================================================

/// In-memory ShiftRepository
#[derive(Default)]
pub struct MemoryShiftRepository {
    rows: Mutex<Vec<Shift>>,
    next_id: AtomicI64,
    /// Shift ids whose `end` call should fail, for bulk-isolation tests
    fail_end_ids: Mutex<HashSet<i64>>,
}

impl MemoryShiftRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_end_ids: Mutex::new(HashSet::new()),
        }
    }

    /// Make `end` fail for this id until cleared
    pub fn fail_end_for(&self, id: ShiftId) {
        self.fail_end_ids.lock().insert(id.into_inner());
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn matches(filter: &BulkShiftFilter, shift: &Shift) -> bool {
        shift.guild_id == filter.guild_id
            && filter.user_id.is_none_or(|u| shift.user_id == u)
            && filter.before_ts.is_none_or(|ts| shift.start_ts < ts)
            && filter
                .ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&shift.id))
    }
}

#[async_trait]
impl ShiftRepository for MemoryShiftRepository {
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        shift_type: &str,
        start_ts: i64,
    ) -> RepoResult<Shift> {
        let id = ShiftId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let shift = Shift::started(id, user_id, guild_id, shift_type, start_ts);
        self.rows.lock().push(shift.clone());
        Ok(shift)
    }

    async fn find_by_id(&self, id: ShiftId) -> RepoResult<Option<Shift>> {
        Ok(self.rows.lock().iter().find(|s| s.id == id).cloned())
    }

    async fn find_active(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .rev()
            .find(|s| {
                s.user_id == user_id && s.guild_id == guild_id && s.status == ShiftStatus::Active
            })
            .cloned())
    }

    async fn find_paused(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .rev()
            .find(|s| {
                s.user_id == user_id && s.guild_id == guild_id && s.status == ShiftStatus::Paused
            })
            .cloned())
    }

    async fn find_open(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Shift>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .rev()
            .find(|s| s.user_id == user_id && s.guild_id == guild_id && s.status.is_open())
            .cloned())
    }

    async fn pause(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        let mut rows = self.rows.lock();
        let Some(shift) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if shift.pause_at(now).is_err() {
            return Ok(None);
        }
        Ok(Some(shift.clone()))
    }

    async fn resume(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        let mut rows = self.rows.lock();
        let Some(shift) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if shift.resume_at(now).is_err() {
            return Ok(None);
        }
        Ok(Some(shift.clone()))
    }

    async fn end(&self, id: ShiftId, now: i64) -> RepoResult<Option<Shift>> {
        if self.fail_end_ids.lock().contains(&id.into_inner()) {
            return Err(DomainError::DatabaseError("injected failure".to_string()));
        }
        let mut rows = self.rows.lock();
        let Some(shift) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if shift.end_at(now).is_err() {
            return Ok(None);
        }
        Ok(Some(shift.clone()))
    }

    async fn find_open_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|s| s.status.is_open() && Self::matches(filter, s))
            .cloned()
            .collect())
    }

    async fn find_matching(&self, filter: &BulkShiftFilter) -> RepoResult<Vec<Shift>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|s| Self::matches(filter, s))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ShiftId) -> RepoResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }
}

// ============================================================================
// LoA store
// ============================================================================

/// In-memory LoaRepository
#[derive(Default)]
pub struct MemoryLoaRepository {
    rows: Mutex<Vec<Loa>>,
    next_id: AtomicI64,
}

impl MemoryLoaRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl LoaRepository for MemoryLoaRepository {
    async fn create(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        start_ts: i64,
        end_ts: i64,
        reason: &str,
    ) -> RepoResult<Loa> {
        let loa = Loa {
            id: LoaId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id,
            guild_id,
            start_ts,
            end_ts,
            reason: reason.to_string(),
            status: LoaStatus::Pending,
            actor_id: None,
        };
        self.rows.lock().push(loa.clone());
        Ok(loa)
    }

    async fn find_by_id(&self, id: LoaId) -> RepoResult<Option<Loa>> {
        Ok(self.rows.lock().iter().find(|l| l.id == id).cloned())
    }

    async fn resolve(
        &self,
        id: LoaId,
        decision: LoaStatus,
        actor_id: Snowflake,
    ) -> RepoResult<Option<Loa>> {
        let mut rows = self.rows.lock();
        let Some(loa) = rows.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if loa.resolve(decision, actor_id).is_err() {
            return Ok(None);
        }
        Ok(Some(loa.clone()))
    }

    async fn list_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<Loa>> {
        let mut rows: Vec<Loa> = self
            .rows
            .lock()
            .iter()
            .filter(|l| l.user_id == user_id && l.guild_id == guild_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn list_for_guild(&self, guild_id: Snowflake, limit: i64) -> RepoResult<Vec<Loa>> {
        let mut rows: Vec<Loa> = self
            .rows
            .lock()
            .iter()
            .filter(|l| l.guild_id == guild_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn latest_for_user(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
    ) -> RepoResult<Option<Loa>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|l| l.user_id == user_id && l.guild_id == guild_id)
            .max_by_key(|l| l.id)
            .cloned())
    }
}

// ============================================================================
// Audit store
// ============================================================================

/// In-memory AuditLogRepository
#[derive(Default)]
pub struct MemoryAuditLogRepository {
    rows: Mutex<Vec<AuditLogEntry>>,
    next_id: AtomicI64,
    fail_next: AtomicBool,
}

impl MemoryAuditLogRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next append fail once
    pub fn fail_next_append(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All stored entries, insertion order
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.rows.lock().clone()
    }

    /// Entries carrying the given action tag
    pub fn entries_with_action(&self, action: &str) -> Vec<AuditLogEntry> {
        self.rows
            .lock()
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn append(
        &self,
        user_id: Snowflake,
        guild_id: Snowflake,
        actor_id: Snowflake,
        action: &str,
        data: &str,
        ts: i64,
    ) -> RepoResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("injected failure".to_string()));
        }
        let entry = AuditLogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            guild_id,
            actor_id,
            action: action.to_string(),
            data: data.to_string(),
            ts,
        };
        self.rows.lock().push(entry);
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> RepoResult<Vec<AuditLogEntry>> {
        let mut rows: Vec<AuditLogEntry> = self
            .rows
            .lock()
            .iter()
            .filter(|e| e.user_id == query.user_id && e.guild_id == query.guild_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.ts.cmp(&a.ts).then(b.id.cmp(&a.id)));
        rows.truncate(query.limit.max(0) as usize);
        Ok(rows)
    }
}
