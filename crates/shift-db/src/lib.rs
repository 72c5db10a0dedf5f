//! # shift-db
//!
//! Database layer implementing the ledger repository traits with PostgreSQL
//! via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `shift-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Repository implementations
//!
//! Every state transition (pause/resume/end, LoA resolution) is a single
//! conditional `UPDATE ... WHERE status = ... RETURNING *`, so two concurrent
//! actions on the same row serialize in the database and cannot double-count
//! elapsed time.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shift_db::pool::{create_pool, DatabaseConfig};
//! use shift_db::PgShiftRepository;
//! use shift_core::ShiftRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let shifts = PgShiftRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{PgAuditLogRepository, PgLoaRepository, PgShiftRepository};
