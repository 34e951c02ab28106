//! Workflow error types.

use dompet_shared::{Amount, OrderId, RequestId};
use thiserror::Error;

use crate::ledger::LedgerError;

use super::types::{ApproverRole, RequestStatus, WorkflowKind};

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Request not found.
    #[error("Approval request {0} not found")]
    RequestNotFound(RequestId),

    /// The request already reached a terminal status.
    #[error("Request is already finalized as {status}")]
    AlreadyFinalized {
        /// The terminal status the request holds.
        status: RequestStatus,
    },

    /// The actor's role does not match the stage's required approver.
    #[error("Actor {actor} is not authorized for this stage; requires {required}")]
    UnauthorizedActor {
        /// Description of the acting party.
        actor: String,
        /// The role the current stage requires.
        required: ApproverRole,
    },

    /// The decision does not apply to this workflow kind.
    #[error("Decision {decision} does not apply to {kind} requests")]
    DecisionNotApplicable {
        /// The decision that was attempted.
        decision: &'static str,
        /// The kind of the request.
        kind: WorkflowKind,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// The meal allowance must be supplied before HR approval.
    #[error("A finance-set allowance is required to approve a meal-allowance request")]
    AllowanceRequired,

    /// Monetary requests must carry a positive amount.
    #[error("Request amount must be positive, got {0}")]
    InvalidAmount(Amount),

    /// The disputed order could not be found.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The disbursement ledger call failed; the request was not advanced.
    #[error("Disbursement failed: {0}")]
    Disbursement(#[source] LedgerError),
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::UnauthorizedActor { .. } => "UNAUTHORIZED_ACTOR",
            Self::DecisionNotApplicable { .. } => "DECISION_NOT_APPLICABLE",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::AllowanceRequired => "ALLOWANCE_REQUIRED",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::Disbursement(_) => "DISBURSEMENT_FAILED",
        }
    }
}
