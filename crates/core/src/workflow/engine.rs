//! The staged-approval engine.
//!
//! One state machine drives every chain: `submit` stores a request at its
//! kind's first stage, `advance` validates the actor and decision against
//! the chain tables and applies exactly one forward transition. Terminal
//! approvals that move money call the ledger first and only advance on a
//! successful commit, so a failed disbursement leaves the request
//! retryable at its prior stage.

use std::sync::Arc;

use chrono::Utc;
use dompet_shared::{Amount, OrderId, RequestId};
use tracing::info;

use crate::ledger::{LedgerService, TransactionKind};
use crate::notify::{NotificationSink, Recipient, Severity};
use crate::wallet::AccountRef;

use super::chain::Stage;
use super::error::WorkflowError;
use super::store::ApprovalRequestRepository;
use super::types::{
    Actor, AdvanceContext, ApprovalRequest, Decision, OpexKind, RequestDetail, RequestStatus,
    ResolutionMethod, SubmitRequest, WorkflowKind,
};

/// Read-only access to marketplace order totals.
///
/// Orders live outside this engine; dispute resolution only needs the
/// disputed order's total.
pub trait OrderDirectory: Send + Sync {
    /// Returns the order's total in minor currency units.
    fn order_total(&self, order_id: OrderId) -> Option<Amount>;
}

/// The staged-approval engine.
///
/// Approval records are mutated only here, and only through `advance`.
pub struct ApprovalWorkflowEngine {
    requests: Arc<dyn ApprovalRequestRepository>,
    orders: Arc<dyn OrderDirectory>,
    ledger: Arc<LedgerService>,
    notifier: Arc<dyn NotificationSink>,
}

impl ApprovalWorkflowEngine {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(
        requests: Arc<dyn ApprovalRequestRepository>,
        orders: Arc<dyn OrderDirectory>,
        ledger: Arc<LedgerService>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            requests,
            orders,
            ledger,
            notifier,
        }
    }

    /// Submits a new request at its kind's first stage and notifies the
    /// first-stage approver role.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a monetary request with a non-positive
    /// amount.
    pub fn submit(&self, input: SubmitRequest) -> Result<ApprovalRequest, WorkflowError> {
        match &input {
            SubmitRequest::Opex { amount, .. } | SubmitRequest::InsuranceClaim { amount, .. }
                if *amount <= 0 =>
            {
                return Err(WorkflowError::InvalidAmount(*amount));
            }
            _ => {}
        }

        let kind = input.kind();
        let request = ApprovalRequest {
            id: RequestId::new(),
            kind,
            status: kind.initial_status(),
            submitted_at: Utc::now(),
            rejection_reason: None,
            detail: input.into_detail(),
        };
        self.requests.insert(request.clone());

        let first = kind.stages()[0];
        self.notifier.notify(
            Recipient::Role(first.approver),
            &format!("New {kind} request {} awaiting review", request.id),
            Severity::Info,
        );
        info!(request = %request.id, kind = %kind, "request submitted");
        Ok(request)
    }

    /// Applies one decision to a request's current stage.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound`, `AlreadyFinalized` for terminal
    /// requests, `DecisionNotApplicable` when the decision does not fit
    /// the kind, `UnauthorizedActor` on a role mismatch, or a
    /// decision-specific validation or disbursement error. On error the
    /// request's status is unchanged.
    pub fn advance(
        &self,
        request_id: RequestId,
        actor: &Actor,
        decision: Decision,
        context: &AdvanceContext,
    ) -> Result<ApprovalRequest, WorkflowError> {
        let request = self
            .requests
            .get(request_id)
            .ok_or(WorkflowError::RequestNotFound(request_id))?;
        if request.status.is_terminal() {
            return Err(WorkflowError::AlreadyFinalized {
                status: request.status,
            });
        }
        let stage = current_stage(request.kind, request.status)?;

        let dispute_decision = matches!(decision, Decision::GrantRefund | Decision::SideWithSeller);
        if dispute_decision != (request.kind == WorkflowKind::Dispute) {
            return Err(WorkflowError::DecisionNotApplicable {
                decision: decision.name(),
                kind: request.kind,
            });
        }
        authorize(stage, actor, &decision, request.kind)?;

        match decision {
            Decision::Reject { reason } => self.reject(request, reason),
            Decision::Approve => self.approve_stage(request, actor, context),
            Decision::GrantRefund => self.resolve_dispute_refund(request, actor),
            Decision::SideWithSeller => self.resolve_dispute_seller(request),
        }
    }

    /// Terminally rejects a request and notifies the requester.
    fn reject(
        &self,
        mut request: ApprovalRequest,
        reason: String,
    ) -> Result<ApprovalRequest, WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }

        request.status = RequestStatus::Rejected;
        request.rejection_reason = Some(reason);
        self.requests.put(request.clone());

        self.notifier.notify(
            Recipient::User(request.requester()),
            &format!(
                "Your {} request was rejected: {}",
                request.kind,
                request.rejection_reason.as_deref().unwrap_or("")
            ),
            Severity::Warning,
        );
        info!(request = %request.id, "request rejected");
        Ok(request)
    }

    /// Approves the current stage: either moves to the next stage or, at
    /// the final stage, disburses and terminally approves.
    fn approve_stage(
        &self,
        mut request: ApprovalRequest,
        actor: &Actor,
        context: &AdvanceContext,
    ) -> Result<ApprovalRequest, WorkflowError> {
        stamp_stage_approval(&mut request, actor, context)?;

        if let Some(next) = request.kind.next_stage(request.status) {
            request.status = next.status;
            self.requests.put(request.clone());
            self.notifier.notify(
                Recipient::Role(next.approver),
                &format!(
                    "{} request {} awaiting your approval",
                    request.kind, request.id
                ),
                Severity::Info,
            );
            info!(request = %request.id, status = %request.status, "request advanced");
            return Ok(request);
        }

        // Final stage: disburse before advancing. A ledger failure leaves
        // the request at its current stage for retry.
        self.disburse(&request)?;
        request.status = request.kind.approved_status();
        self.requests.put(request.clone());
        self.notifier.notify(
            Recipient::User(request.requester()),
            &format!("Your {} request was approved", request.kind),
            Severity::Info,
        );
        info!(request = %request.id, "request approved");
        Ok(request)
    }

    /// Commits the payout for a terminally approved request.
    fn disburse(&self, request: &ApprovalRequest) -> Result<(), WorkflowError> {
        match &request.detail {
            RequestDetail::Opex(detail) => {
                self.ledger
                    .record_operational_expense(
                        detail.requester,
                        detail.amount,
                        &format!(
                            "Opex reimbursement ({}) for request {}",
                            detail.expense_kind, request.id
                        ),
                    )
                    .map_err(WorkflowError::Disbursement)?;
            }
            RequestDetail::InsuranceClaim(detail) => {
                self.ledger
                    .add_transaction(
                        AccountRef::User(detail.requester),
                        TransactionKind::InsuranceClaim,
                        detail.amount,
                        format!("Insurance claim payout for request {}", request.id),
                        None,
                    )
                    .map_err(WorkflowError::Disbursement)?;
            }
            RequestDetail::Leave(_) | RequestDetail::Dispute(_) => {}
        }
        Ok(())
    }

    /// Resolves a dispute by moving the order total from seller to buyer.
    fn resolve_dispute_refund(
        &self,
        mut request: ApprovalRequest,
        actor: &Actor,
    ) -> Result<ApprovalRequest, WorkflowError> {
        let Some(detail) = request.as_dispute() else {
            return Err(WorkflowError::DecisionNotApplicable {
                decision: "grant_refund",
                kind: request.kind,
            });
        };
        let (order_id, buyer, seller) = (detail.order_id, detail.buyer, detail.seller);

        let total = self
            .orders
            .order_total(order_id)
            .ok_or(WorkflowError::OrderNotFound(order_id))?;
        self.ledger
            .transfer(
                AccountRef::User(seller),
                AccountRef::User(buyer),
                total,
                TransactionKind::Reversal,
                TransactionKind::Refund,
                &format!("Dispute refund for order {order_id}"),
            )
            .map_err(WorkflowError::Disbursement)?;

        let method = match actor {
            Actor::Guardian => ResolutionMethod::Guardian,
            Actor::User { .. } => ResolutionMethod::Admin,
        };
        if let RequestDetail::Dispute(detail) = &mut request.detail {
            detail.resolution_method = Some(method);
        }
        request.status = RequestStatus::Resolved;
        self.requests.put(request.clone());

        self.notifier.notify(
            Recipient::User(buyer),
            &format!("Your dispute for order {order_id} was resolved with a refund of {total}"),
            Severity::Info,
        );
        self.notifier.notify(
            Recipient::User(seller),
            &format!("Order {order_id} was refunded to the buyer after a dispute"),
            Severity::Warning,
        );
        info!(request = %request.id, method = %method, "dispute resolved with refund");
        Ok(request)
    }

    /// Resolves a dispute in the seller's favor; no money moves.
    fn resolve_dispute_seller(
        &self,
        mut request: ApprovalRequest,
    ) -> Result<ApprovalRequest, WorkflowError> {
        let Some(detail) = request.as_dispute() else {
            return Err(WorkflowError::DecisionNotApplicable {
                decision: "side_with_seller",
                kind: request.kind,
            });
        };
        let (order_id, buyer) = (detail.order_id, detail.buyer);

        if let RequestDetail::Dispute(detail) = &mut request.detail {
            detail.resolution_method = Some(ResolutionMethod::Admin);
        }
        request.status = RequestStatus::Resolved;
        self.requests.put(request.clone());

        self.notifier.notify(
            Recipient::User(buyer),
            &format!("Your dispute for order {order_id} was resolved in the seller's favor"),
            Severity::Info,
        );
        info!(request = %request.id, "dispute resolved for the seller");
        Ok(request)
    }
}

/// Looks up the pending stage a request currently sits at.
fn current_stage(kind: WorkflowKind, status: RequestStatus) -> Result<Stage, WorkflowError> {
    kind.stage_index(status)
        .map(|index| kind.stages()[index])
        .ok_or(WorkflowError::AlreadyFinalized { status })
}

/// Checks the actor against the stage's required role. The Guardian is
/// accepted only for granting refunds on disputes.
fn authorize(
    stage: Stage,
    actor: &Actor,
    decision: &Decision,
    kind: WorkflowKind,
) -> Result<(), WorkflowError> {
    let allowed = match actor {
        Actor::User { role, .. } => *role == stage.approver,
        Actor::Guardian => {
            kind == WorkflowKind::Dispute && matches!(decision, Decision::GrantRefund)
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(WorkflowError::UnauthorizedActor {
            actor: actor.to_string(),
            required: stage.approver,
        })
    }
}

/// Records per-stage audit fields on the payload before advancement. For
/// meal-allowance requests the HR stage must supply the finance-set
/// allowance, which replaces the requested amount.
fn stamp_stage_approval(
    request: &mut ApprovalRequest,
    actor: &Actor,
    context: &AdvanceContext,
) -> Result<(), WorkflowError> {
    let status = request.status;
    let approver = actor.user_id();

    if let RequestDetail::Opex(detail) = &mut request.detail {
        match status {
            RequestStatus::PendingHrVerification => {
                if detail.expense_kind == OpexKind::MealAllowance {
                    let allowance = context
                        .approved_amount
                        .ok_or(WorkflowError::AllowanceRequired)?;
                    if allowance <= 0 {
                        return Err(WorkflowError::InvalidAmount(allowance));
                    }
                    detail.amount = allowance;
                }
                detail.hr_approver = approver;
                detail.hr_approved_at = Some(Utc::now());
            }
            RequestStatus::PendingFinanceApproval => {
                detail.finance_approver = approver;
                detail.finance_approved_at = Some(Utc::now());
            }
            _ => {}
        }
    }
    Ok(())
}
