//! Property-based tests for the approval engine.
//!
//! - Status monotonicity under arbitrary actor/decision sequences
//! - Approval implies the full chain was walked and the payout committed

use std::sync::Arc;

use dompet_shared::{Amount, OrderId, UserId};
use proptest::prelude::*;

use crate::ledger::{InMemoryTransactionLog, LedgerService, TransactionKind, TransactionRepository};
use crate::notify::NullNotificationSink;
use crate::wallet::{AccountRef, AdminAccount, InMemoryWalletStore, Wallet, WalletRepository};

use super::engine::{ApprovalWorkflowEngine, OrderDirectory};
use super::store::{ApprovalRequestRepository, InMemoryRequestStore};
use super::types::{
    Actor, AdvanceContext, ApproverRole, Decision, OpexKind, RequestStatus, SubmitRequest,
};

struct NoOrders;

impl OrderDirectory for NoOrders {
    fn order_total(&self, _order_id: OrderId) -> Option<Amount> {
        None
    }
}

struct Harness {
    wallets: Arc<InMemoryWalletStore>,
    transactions: Arc<InMemoryTransactionLog>,
    requests: Arc<InMemoryRequestStore>,
    engine: ApprovalWorkflowEngine,
}

fn harness() -> Harness {
    let wallets = Arc::new(InMemoryWalletStore::new());
    let transactions = Arc::new(InMemoryTransactionLog::new());
    let requests = Arc::new(InMemoryRequestStore::new());
    let ledger = Arc::new(LedgerService::new(
        wallets.clone(),
        transactions.clone(),
        Arc::new(NullNotificationSink),
    ));
    let engine = ApprovalWorkflowEngine::new(
        requests.clone(),
        Arc::new(NoOrders),
        ledger,
        Arc::new(NullNotificationSink),
    );
    Harness {
        wallets,
        transactions,
        requests,
        engine,
    }
}

/// Position of a status along the opex chain; terminal statuses rank last.
fn rank(status: RequestStatus) -> usize {
    match status {
        RequestStatus::PendingHrVerification => 0,
        RequestStatus::PendingFinanceApproval => 1,
        _ => 2,
    }
}

fn actor_strategy() -> impl Strategy<Value = Actor> {
    prop_oneof![
        Just(ApproverRole::Hr),
        Just(ApproverRole::Finance),
        Just(ApproverRole::Admin),
    ]
    .prop_map(|role| Actor::User {
        id: UserId::new(),
        role,
    })
}

fn decision_strategy() -> impl Strategy<Value = Decision> {
    prop_oneof![
        Just(Decision::Approve),
        Just(Decision::Reject {
            reason: "Not eligible".to_string(),
        }),
        Just(Decision::GrantRefund),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of actors and decisions, an opex request's
    /// status only ever moves forward along its chain, and it is never
    /// observed `Approved` without having passed finance approval with a
    /// committed payout.
    #[test]
    fn prop_opex_status_is_monotonic(
        steps in prop::collection::vec((actor_strategy(), decision_strategy()), 1..12),
    ) {
        let h = harness();
        h.wallets.put_admin_balance(AdminAccount::Cash, 10_000_000);
        let requester = UserId::new();
        h.wallets.insert(Wallet::new(requester)).unwrap();

        let request = h.engine.submit(SubmitRequest::Opex {
            requester,
            branch: "Jakarta".to_string(),
            expense_kind: OpexKind::Transport,
            amount: 50_000,
        }).unwrap();

        let mut observed = vec![request.status];
        for (actor, decision) in steps {
            let _ = h.engine.advance(
                request.id,
                &actor,
                decision,
                &AdvanceContext::default(),
            );
            let status = h.requests.get(request.id).unwrap().status;
            let previous = *observed.last().unwrap();
            prop_assert!(
                rank(status) >= rank(previous),
                "status moved backward: {previous} -> {status}"
            );
            observed.push(status);
        }

        let status = *observed.last().unwrap();
        if status == RequestStatus::Approved {
            prop_assert!(observed.contains(&RequestStatus::PendingFinanceApproval));

            let detail = h.requests.get(request.id).unwrap();
            let opex = detail.as_opex().unwrap().clone();
            prop_assert!(opex.hr_approved_at.is_some());
            prop_assert!(opex.finance_approved_at.is_some());

            let payouts: Vec<_> = h
                .transactions
                .list_for_owner(AccountRef::User(requester))
                .into_iter()
                .filter(|t| t.kind == TransactionKind::DanaOpex)
                .collect();
            prop_assert_eq!(payouts.len(), 1);
            prop_assert_eq!(payouts[0].amount, 50_000);
        }
    }
}
