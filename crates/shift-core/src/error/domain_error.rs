//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::{LoaStatus, ShiftStatus};
use crate::value_objects::{LoaId, ShiftId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Shift not found: {0}")]
    ShiftNotFound(ShiftId),

    #[error("LoA request not found: {0}")]
    LoaNotFound(LoaId),

    #[error("No active shift found")]
    NoActiveShift,

    #[error("No paused shift found")]
    NoPausedShift,

    #[error("No active or paused shift found")]
    NoOpenShift,

    #[error("No LoA request found")]
    NoLoaRecord,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the owner of this shift")]
    NotShiftOwner,

    #[error("Admin rights required")]
    AdminRequired,

    // =========================================================================
    // Invalid State Errors
    // =========================================================================
    #[error("Shift is {status}, not active")]
    ShiftNotActive { status: ShiftStatus },

    #[error("Shift is {status}, not paused")]
    ShiftNotPaused { status: ShiftStatus },

    #[error("Shift is {status}, already closed")]
    ShiftNotOpen { status: ShiftStatus },

    #[error("LoA request already {status}")]
    LoaAlreadyResolved { status: LoaStatus },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bulk filter matches everything; narrow it by user, date or ids")]
    EmptyBulkFilter,

    #[error("No valid ids in list")]
    InvalidIdList,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for rendered replies and logs
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ShiftNotFound(_) => "UNKNOWN_SHIFT",
            Self::LoaNotFound(_) => "UNKNOWN_LOA",
            Self::NoActiveShift => "NO_ACTIVE_SHIFT",
            Self::NoPausedShift => "NO_PAUSED_SHIFT",
            Self::NoOpenShift => "NO_OPEN_SHIFT",
            Self::NoLoaRecord => "NO_LOA_RECORD",

            // Authorization
            Self::NotShiftOwner => "NOT_SHIFT_OWNER",
            Self::AdminRequired => "ADMIN_REQUIRED",

            // Invalid State
            Self::ShiftNotActive { .. } => "SHIFT_NOT_ACTIVE",
            Self::ShiftNotPaused { .. } => "SHIFT_NOT_PAUSED",
            Self::ShiftNotOpen { .. } => "SHIFT_NOT_OPEN",
            Self::LoaAlreadyResolved { .. } => "LOA_ALREADY_RESOLVED",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyBulkFilter => "EMPTY_BULK_FILTER",
            Self::InvalidIdList => "INVALID_ID_LIST",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ShiftNotFound(_)
                | Self::LoaNotFound(_)
                | Self::NoActiveShift
                | Self::NoPausedShift
                | Self::NoOpenShift
                | Self::NoLoaRecord
        )
    }

    /// Check if this is an authorization error
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::NotShiftOwner | Self::AdminRequired)
    }

    /// Check if this is an invalid-state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::ShiftNotActive { .. }
                | Self::ShiftNotPaused { .. }
                | Self::ShiftNotOpen { .. }
                | Self::LoaAlreadyResolved { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::EmptyBulkFilter | Self::InvalidIdList
        )
    }
}
