//! # shift-service
//!
//! Application layer for the shift/LoA ledger: business services over the
//! repository ports, caller authorization, validated request/response DTOs,
//! and the command dispatcher that turns structured actions into ledger calls
//! plus fire-and-forget effect descriptions.

pub mod dispatch;
pub mod dto;
pub mod services;

// Re-export the surface an embedding bot needs
pub use dispatch::{Action, ActionRequest, Dispatcher, Outcome, Reply};
pub use dto::{
    BulkFilterRequest, LoaRequestInput, LoaSnapshot, ShiftSnapshot, StartShiftRequest,
};
pub use services::{
    AccessPolicy, Actor, AuditService, BulkOutcome, LoaOutcome, LoaService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ShiftOutcome, ShiftService,
};
