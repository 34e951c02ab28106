//! Staged approval workflows.
//!
//! This module implements one configurable state machine driving every
//! approval chain in the system:
//!
//! - `types` - Request records, statuses, roles, decisions
//! - `chain` - Per-kind stage sequences and required approver roles
//! - `error` - Workflow-specific error types
//! - `store` - Request repository interface and in-memory store
//! - `engine` - Submission and stage advancement, including disbursement

pub mod chain;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use chain::Stage;
pub use engine::{ApprovalWorkflowEngine, OrderDirectory};
pub use error::WorkflowError;
pub use store::{ApprovalRequestRepository, InMemoryRequestStore};
pub use types::{
    Actor, AdvanceContext, ApprovalRequest, ApproverRole, ClaimDetail, Decision, DisputeDetail,
    LeaveDetail, OpexDetail, OpexKind, RequestDetail, RequestStatus, ResolutionMethod,
    SubmitRequest, WorkflowKind,
};
