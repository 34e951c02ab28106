//! Property-based tests for LedgerService.
//!
//! - Balance non-negativity under arbitrary mutation sequences
//! - Frozen wallets rejecting every debit
//! - Reversal round trips

use std::sync::Arc;

use dompet_shared::{Amount, UserId};
use proptest::prelude::*;

use crate::notify::NullNotificationSink;
use crate::wallet::{AccountRef, InMemoryWalletStore, Wallet, WalletRepository};

use super::error::LedgerError;
use super::service::LedgerService;
use super::store::{InMemoryTransactionLog, TransactionRepository};
use super::types::TransactionKind;

struct Harness {
    wallets: Arc<InMemoryWalletStore>,
    transactions: Arc<InMemoryTransactionLog>,
    ledger: LedgerService,
}

fn harness() -> Harness {
    let wallets = Arc::new(InMemoryWalletStore::new());
    let transactions = Arc::new(InMemoryTransactionLog::new());
    let ledger = LedgerService::new(
        wallets.clone(),
        transactions.clone(),
        Arc::new(NullNotificationSink),
    );
    Harness {
        wallets,
        transactions,
        ledger,
    }
}

fn funded_wallet(h: &Harness, balance: Amount) -> UserId {
    let owner = UserId::new();
    h.wallets.insert(Wallet::new(owner)).unwrap();
    if balance > 0 {
        h.ledger
            .add_transaction(
                AccountRef::User(owner),
                TransactionKind::TopUp,
                balance,
                "Top-up",
                None,
            )
            .unwrap();
    }
    owner
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of attempted mutations, the wallet balance is
    /// never observed negative and always equals the sum of the committed
    /// records.
    #[test]
    fn prop_balance_never_negative(
        deltas in prop::collection::vec(-20_000i64..20_000, 1..40),
    ) {
        let h = harness();
        let owner = funded_wallet(&h, 0);
        let account = AccountRef::User(owner);

        for delta in deltas {
            if delta != 0 {
                let _ = h.ledger.add_transaction(
                    account,
                    TransactionKind::Marketplace,
                    delta,
                    "Mutation",
                    None,
                );
            }
            prop_assert!(h.ledger.balance(account).unwrap() >= 0);
        }

        let committed: Amount = h
            .transactions
            .list_for_owner(account)
            .iter()
            .map(|t| t.amount)
            .sum();
        prop_assert_eq!(h.ledger.balance(account).unwrap(), committed);
    }

    /// *For any* debit against a frozen wallet, the operation fails with
    /// the frozen error and the balance is unchanged, regardless of the
    /// requested amount.
    #[test]
    fn prop_frozen_wallet_rejects_every_debit(
        initial in 0i64..1_000_000,
        debits in prop::collection::vec(1i64..2_000_000, 1..20),
    ) {
        let h = harness();
        let owner = funded_wallet(&h, initial);
        let account = AccountRef::User(owner);
        h.wallets.set_frozen(owner, true).unwrap();

        for debit in debits {
            let result = h.ledger.add_transaction(
                account,
                TransactionKind::Marketplace,
                -debit,
                "Debit attempt",
                None,
            );
            prop_assert!(matches!(result, Err(LedgerError::WalletFrozen(_))));
            prop_assert_eq!(h.ledger.balance(account).unwrap(), initial);
        }
    }

    /// *For any* committed debit, reversing it creates a record with the
    /// negated amount referencing the original, and leaves the original
    /// unchanged and retrievable.
    #[test]
    fn prop_reversal_round_trip(amount in 1i64..1_000_000) {
        let h = harness();
        let owner = funded_wallet(&h, amount);
        let account = AccountRef::User(owner);

        let original = h.ledger.add_transaction(
            account,
            TransactionKind::Marketplace,
            -amount,
            "Purchase",
            None,
        ).unwrap();

        let reversal = h.ledger.reverse_transaction(original.id).unwrap();

        prop_assert_eq!(reversal.amount, -original.amount);
        prop_assert_eq!(reversal.related_id, Some(original.id));
        prop_assert_eq!(reversal.kind, TransactionKind::Reversal);
        prop_assert_eq!(h.ledger.balance(account).unwrap(), amount);
        prop_assert_eq!(h.transactions.get(original.id), Some(original));
    }
}
