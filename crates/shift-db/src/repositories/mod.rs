//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in shift-core.
//! Each repository handles database operations for a specific domain entity.

mod audit_log;
mod error;
mod loa;
mod shift;

pub use audit_log::PgAuditLogRepository;
pub use loa::PgLoaRepository;
pub use shift::PgShiftRepository;
