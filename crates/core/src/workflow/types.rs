//! Approval workflow domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use dompet_shared::{Amount, OrderId, RequestId, UserId};
use serde::{Deserialize, Serialize};

/// The kind of approval chain a request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Operational-expense reimbursement.
    Opex,
    /// Insurance claim.
    InsuranceClaim,
    /// Leave request.
    Leave,
    /// Marketplace dispute.
    Dispute,
}

impl WorkflowKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opex => "opex",
            Self::InsuranceClaim => "insurance_claim",
            Self::Leave => "leave",
            Self::Dispute => "dispute",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a request in its approval chain.
///
/// Staged kinds move through their pending stages to `Approved` or
/// `Rejected`; disputes move from `Open` to `Resolved`. Terminal statuses
/// have no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting HR verification (first opex stage).
    PendingHrVerification,
    /// Awaiting finance approval (second opex stage).
    PendingFinanceApproval,
    /// Awaiting its single review stage (claims, leave).
    Pending,
    /// Dispute awaiting resolution.
    Open,
    /// Terminally approved; any disbursement has been committed.
    Approved,
    /// Terminally rejected.
    Rejected,
    /// Dispute terminally resolved.
    Resolved,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingHrVerification => "pending_hr_verification",
            Self::PendingFinanceApproval => "pending_finance_approval",
            Self::Pending => "pending",
            Self::Open => "open",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Resolved => "resolved",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_hr_verification" => Some(Self::PendingHrVerification),
            "pending_finance_approval" => Some(Self::PendingFinanceApproval),
            "pending" => Some(Self::Pending),
            "open" => Some(Self::Open),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Returns true for statuses with no outgoing transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Resolved)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role required to act on an approval stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApproverRole {
    /// Human-resources operators.
    Hr,
    /// Finance operators.
    Finance,
    /// Platform administrators.
    Admin,
}

impl ApproverRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Finance => "finance",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hr" => Some(Self::Hr),
            "finance" => Some(Self::Finance),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The acting party in an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A human operator holding a role.
    User {
        /// The operator's user ID.
        id: UserId,
        /// The role the operator acts under.
        role: ApproverRole,
    },
    /// The automated dispute resolver.
    Guardian,
}

impl Actor {
    /// The operator's user ID, if this is a human actor.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User { id, .. } => Some(*id),
            Self::Guardian => None,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { id, role } => write!(f, "{role} user {id}"),
            Self::Guardian => write!(f, "guardian"),
        }
    }
}

/// A decision applied to a request's current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Approve the current stage.
    Approve,
    /// Reject the request outright.
    Reject {
        /// The reason surfaced to the requester.
        reason: String,
    },
    /// Resolve a dispute by refunding the buyer.
    GrantRefund,
    /// Resolve a dispute in the seller's favor.
    SideWithSeller,
}

impl Decision {
    /// Returns the string name of the decision.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
            Self::GrantRefund => "grant_refund",
            Self::SideWithSeller => "side_with_seller",
        }
    }
}

/// Extra data supplied alongside a decision.
#[derive(Debug, Clone, Default)]
pub struct AdvanceContext {
    /// Finance-set allowance overriding the requested amount. Required at
    /// the HR stage of meal-allowance requests.
    pub approved_amount: Option<Amount>,
}

/// Operational-expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpexKind {
    /// Meal allowance; the payout amount is set by finance policy, not the
    /// requester.
    MealAllowance,
    /// Transport costs.
    Transport,
    /// Lodging costs.
    Lodging,
    /// Branch supplies.
    Supplies,
}

impl OpexKind {
    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MealAllowance => "meal_allowance",
            Self::Transport => "transport",
            Self::Lodging => "lodging",
            Self::Supplies => "supplies",
        }
    }
}

impl fmt::Display for OpexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a dispute reached `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    /// Auto-resolved by the Guardian sweep.
    Guardian,
    /// Resolved by an administrator.
    Admin,
}

impl ResolutionMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of an operational-expense request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpexDetail {
    /// The employee requesting reimbursement.
    pub requester: UserId,
    /// The branch the expense belongs to.
    pub branch: String,
    /// Expense category.
    pub expense_kind: OpexKind,
    /// Amount to disburse. For meal allowances this is overwritten with
    /// the finance-set allowance at HR verification.
    pub amount: Amount,
    /// The HR operator who verified the request.
    pub hr_approver: Option<UserId>,
    /// When HR verification happened.
    pub hr_approved_at: Option<DateTime<Utc>>,
    /// The finance operator who approved the request.
    pub finance_approver: Option<UserId>,
    /// When finance approval happened.
    pub finance_approved_at: Option<DateTime<Utc>>,
}

/// Payload of an insurance claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDetail {
    /// The employee filing the claim.
    pub requester: UserId,
    /// The branch the claim belongs to.
    pub branch: String,
    /// Free-form policy category.
    pub claim_kind: String,
    /// Amount to disburse on approval.
    pub amount: Amount,
    /// Reference to the uploaded receipt.
    pub receipt_ref: String,
}

/// Payload of a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDetail {
    /// The employee requesting leave.
    pub requester: UserId,
    /// The branch the employee belongs to.
    pub branch: String,
    /// Stated reason for the leave.
    pub reason: String,
}

/// Payload of a marketplace dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeDetail {
    /// The disputed order.
    pub order_id: OrderId,
    /// The buyer who filed the dispute.
    pub buyer: UserId,
    /// The seller of the disputed order.
    pub seller: UserId,
    /// Stated reason for the dispute.
    pub reason: String,
    /// How the dispute was resolved, once it is.
    pub resolution_method: Option<ResolutionMethod>,
}

/// Kind-specific request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDetail {
    /// Operational-expense reimbursement.
    Opex(OpexDetail),
    /// Insurance claim.
    InsuranceClaim(ClaimDetail),
    /// Leave request.
    Leave(LeaveDetail),
    /// Marketplace dispute.
    Dispute(DisputeDetail),
}

/// A staged approval request.
///
/// Requests are mutated only by the workflow engine through `advance`;
/// terminal requests are retained for audit, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique identifier.
    pub id: RequestId,
    /// The chain this request moves through.
    pub kind: WorkflowKind,
    /// Current position in the chain.
    pub status: RequestStatus,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Reason recorded on rejection.
    pub rejection_reason: Option<String>,
    /// Kind-specific payload.
    pub detail: RequestDetail,
}

impl ApprovalRequest {
    /// The user on whose behalf the request was filed. For disputes this
    /// is the buyer.
    #[must_use]
    pub const fn requester(&self) -> UserId {
        match &self.detail {
            RequestDetail::Opex(detail) => detail.requester,
            RequestDetail::InsuranceClaim(detail) => detail.requester,
            RequestDetail::Leave(detail) => detail.requester,
            RequestDetail::Dispute(detail) => detail.buyer,
        }
    }

    /// The opex payload, if this is an opex request.
    #[must_use]
    pub const fn as_opex(&self) -> Option<&OpexDetail> {
        match &self.detail {
            RequestDetail::Opex(detail) => Some(detail),
            _ => None,
        }
    }

    /// The dispute payload, if this is a dispute.
    #[must_use]
    pub const fn as_dispute(&self) -> Option<&DisputeDetail> {
        match &self.detail {
            RequestDetail::Dispute(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Input to `ApprovalWorkflowEngine::submit`.
#[derive(Debug, Clone)]
pub enum SubmitRequest {
    /// File an operational-expense reimbursement.
    Opex {
        /// The employee requesting reimbursement.
        requester: UserId,
        /// The branch the expense belongs to.
        branch: String,
        /// Expense category.
        expense_kind: OpexKind,
        /// Requested amount.
        amount: Amount,
    },
    /// File an insurance claim.
    InsuranceClaim {
        /// The employee filing the claim.
        requester: UserId,
        /// The branch the claim belongs to.
        branch: String,
        /// Free-form policy category.
        claim_kind: String,
        /// Claimed amount.
        amount: Amount,
        /// Reference to the uploaded receipt.
        receipt_ref: String,
    },
    /// File a leave request.
    Leave {
        /// The employee requesting leave.
        requester: UserId,
        /// The branch the employee belongs to.
        branch: String,
        /// Stated reason for the leave.
        reason: String,
    },
    /// Open a dispute against an order.
    Dispute {
        /// The disputed order.
        order_id: OrderId,
        /// The buyer who filed the dispute.
        buyer: UserId,
        /// The seller of the disputed order.
        seller: UserId,
        /// Stated reason for the dispute.
        reason: String,
    },
}

impl SubmitRequest {
    /// The chain this submission enters.
    #[must_use]
    pub const fn kind(&self) -> WorkflowKind {
        match self {
            Self::Opex { .. } => WorkflowKind::Opex,
            Self::InsuranceClaim { .. } => WorkflowKind::InsuranceClaim,
            Self::Leave { .. } => WorkflowKind::Leave,
            Self::Dispute { .. } => WorkflowKind::Dispute,
        }
    }

    /// Converts the submission into its stored payload.
    #[must_use]
    pub fn into_detail(self) -> RequestDetail {
        match self {
            Self::Opex {
                requester,
                branch,
                expense_kind,
                amount,
            } => RequestDetail::Opex(OpexDetail {
                requester,
                branch,
                expense_kind,
                amount,
                hr_approver: None,
                hr_approved_at: None,
                finance_approver: None,
                finance_approved_at: None,
            }),
            Self::InsuranceClaim {
                requester,
                branch,
                claim_kind,
                amount,
                receipt_ref,
            } => RequestDetail::InsuranceClaim(ClaimDetail {
                requester,
                branch,
                claim_kind,
                amount,
                receipt_ref,
            }),
            Self::Leave {
                requester,
                branch,
                reason,
            } => RequestDetail::Leave(LeaveDetail {
                requester,
                branch,
                reason,
            }),
            Self::Dispute {
                order_id,
                buyer,
                seller,
                reason,
            } => RequestDetail::Dispute(DisputeDetail {
                order_id,
                buyer,
                seller,
                reason,
                resolution_method: None,
            }),
        }
    }
}
