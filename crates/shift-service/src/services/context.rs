//! Service context - dependency container for services
//!
//! Holds the repositories, clock, and guard-rail configuration every service
//! needs. Repositories are trait objects so the whole service layer runs
//! unchanged against PostgreSQL or the in-memory test store.

use std::sync::Arc;

use shift_common::GuardRails;
use shift_core::{AuditLogRepository, Clock, LoaRepository, ShiftRepository};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    shift_repo: Arc<dyn ShiftRepository>,
    loa_repo: Arc<dyn LoaRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    clock: Arc<dyn Clock>,
    guard_rails: GuardRails,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        shift_repo: Arc<dyn ShiftRepository>,
        loa_repo: Arc<dyn LoaRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        clock: Arc<dyn Clock>,
        guard_rails: GuardRails,
    ) -> Self {
        Self {
            shift_repo,
            loa_repo,
            audit_repo,
            clock,
            guard_rails,
        }
    }

    /// Get the shift repository
    pub fn shift_repo(&self) -> &dyn ShiftRepository {
        self.shift_repo.as_ref()
    }

    /// Get the LoA repository
    pub fn loa_repo(&self) -> &dyn LoaRepository {
        self.loa_repo.as_ref()
    }

    /// Get the audit log repository
    pub fn audit_repo(&self) -> &dyn AuditLogRepository {
        self.audit_repo.as_ref()
    }

    /// Get the clock
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current time in epoch seconds
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Get the guard-rail configuration
    pub fn guard_rails(&self) -> &GuardRails {
        &self.guard_rails
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("guard_rails", &self.guard_rails)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    shift_repo: Option<Arc<dyn ShiftRepository>>,
    loa_repo: Option<Arc<dyn LoaRepository>>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    clock: Option<Arc<dyn Clock>>,
    guard_rails: GuardRails,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            shift_repo: None,
            loa_repo: None,
            audit_repo: None,
            clock: None,
            guard_rails: GuardRails::default(),
        }
    }

    pub fn shift_repo(mut self, repo: Arc<dyn ShiftRepository>) -> Self {
        self.shift_repo = Some(repo);
        self
    }

    pub fn loa_repo(mut self, repo: Arc<dyn LoaRepository>) -> Self {
        self.loa_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn guard_rails(mut self, guard_rails: GuardRails) -> Self {
        self.guard_rails = guard_rails;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.shift_repo
                .ok_or_else(|| super::error::ServiceError::validation("shift_repo is required"))?,
            self.loa_repo
                .ok_or_else(|| super::error::ServiceError::validation("loa_repo is required"))?,
            self.audit_repo
                .ok_or_else(|| super::error::ServiceError::validation("audit_repo is required"))?,
            self.clock
                .ok_or_else(|| super::error::ServiceError::validation("clock is required"))?,
            self.guard_rails,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
