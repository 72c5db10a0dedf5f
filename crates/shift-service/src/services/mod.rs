//! Business logic services
//!
//! This module contains the service layer implementations handling
//! authorization, validation, and orchestration of ledger operations.

pub mod access;
pub mod audit;
pub mod context;
pub mod error;
pub mod loa;
pub mod shift;

// Re-export all services for convenience
pub use access::{AccessPolicy, Actor};
pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use loa::{LoaOutcome, LoaService};
pub use shift::{BulkOutcome, ShiftOutcome, ShiftService};
