//! Data transfer objects for ledger requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for action inputs
//! - Snapshot DTOs for rendering ledger records

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{BulkFilterRequest, LoaRequestInput, StartShiftRequest};

// Re-export commonly used response types
pub use responses::{format_duration, LoaSnapshot, ShiftSnapshot};
