//! Ledger service: the only component that mutates balances.
//!
//! Every balance change is the result of appending an immutable transaction
//! record. The append and the balance delta are applied inside a per-account
//! critical section, so two callers debiting the same wallet cannot
//! interleave between validation and commit, and a reader never observes a
//! balance without its backing record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dompet_shared::types::money::is_debit;
use dompet_shared::{Amount, TransactionId, UserId};
use tracing::info;

use crate::notify::{NotificationSink, Recipient, Severity};
use crate::wallet::{AccountRef, AdminAccount, WalletRepository};

use super::error::LedgerError;
use super::store::TransactionRepository;
use super::types::{Transaction, TransactionKind, TransactionStatus};

/// Registry of per-account mutexes.
///
/// The repositories have plain key/value semantics, so the critical section
/// that makes validate-append-apply indivisible lives here.
#[derive(Default)]
struct AccountLocks {
    inner: Mutex<HashMap<AccountRef, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    fn lock_for(&self, account: AccountRef) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(account).or_default())
    }
}

/// Ledger service for validated, atomic balance mutation.
///
/// Constructed once with its storage and notification collaborators and
/// shared behind an `Arc`.
pub struct LedgerService {
    wallets: Arc<dyn WalletRepository>,
    transactions: Arc<dyn TransactionRepository>,
    notifier: Arc<dyn NotificationSink>,
    locks: AccountLocks,
}

impl LedgerService {
    /// Creates a ledger service over the given stores.
    #[must_use]
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        transactions: Arc<dyn TransactionRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            wallets,
            transactions,
            notifier,
            locks: AccountLocks::default(),
        }
    }

    /// Appends a transaction record and applies its balance delta.
    ///
    /// Validation order: the wallet must exist, a debit must not hit a
    /// frozen wallet, and a debit must not overdraw the balance. On any
    /// failure no state is mutated; only the insufficient-balance case
    /// emits a user-visible notification.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `WalletNotFound`, `WalletFrozen`, or
    /// `InsufficientBalance`.
    pub fn add_transaction(
        &self,
        owner: AccountRef,
        kind: TransactionKind,
        amount: Amount,
        description: impl Into<String>,
        related_id: Option<TransactionId>,
    ) -> Result<Transaction, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let lock = self.locks.lock_for(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.commit_locked(owner, kind, amount, description.into(), related_id)
    }

    /// Creates a new transaction negating a prior one.
    ///
    /// The original record is untouched; the reversal references it via
    /// `related_id`. Reversal is best effort: it flows through the same
    /// frozen and insufficient-balance validation as any other mutation
    /// and may fail if the funds are already spent.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for an unknown ID, or any
    /// `add_transaction` error for the reversing record itself.
    pub fn reverse_transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let original = self
            .transactions
            .get(id)
            .ok_or(LedgerError::TransactionNotFound(id))?;

        self.add_transaction(
            original.owner,
            TransactionKind::Reversal,
            -original.amount,
            format!("Reversal: {}", original.description),
            Some(id),
        )
    }

    /// Moves `amount` from one account to another as a single atomic unit.
    ///
    /// Both account locks are taken in canonical order and both legs are
    /// validated before either is committed, so the transfer lands fully
    /// or not at all.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`/`NegativeAmount` for a non-positive magnitude,
    /// `SelfTransfer` when both sides name the same account, or any
    /// validation error from either leg.
    pub fn transfer(
        &self,
        from: AccountRef,
        to: AccountRef,
        amount: Amount,
        debit_kind: TransactionKind,
        credit_kind: TransactionKind,
        description: &str,
    ) -> Result<(Transaction, Transaction), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < 0 {
            return Err(LedgerError::NegativeAmount);
        }
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }

        let (first, second) = if from < to { (from, to) } else { (to, from) };
        let first_lock = self.locks.lock_for(first);
        let second_lock = self.locks.lock_for(second);
        let _first_guard = first_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _second_guard = second_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Validate both legs before committing either.
        self.validated_balance(from, -amount)?;
        self.validated_balance(to, amount)?;

        let debit = self.commit_locked(from, debit_kind, -amount, description.to_string(), None)?;
        let credit = self.commit_locked(to, credit_kind, amount, description.to_string(), None)?;
        Ok((debit, credit))
    }

    /// Moves accumulated profit into operating cash.
    ///
    /// # Errors
    ///
    /// Fails without mutation if the profit sub-wallet cannot cover the
    /// amount.
    pub fn transfer_profit_to_cash(
        &self,
        amount: Amount,
    ) -> Result<(Transaction, Transaction), LedgerError> {
        self.transfer(
            AccountRef::Admin(AdminAccount::Profit),
            AccountRef::Admin(AdminAccount::Cash),
            amount,
            TransactionKind::InternalTransfer,
            TransactionKind::InternalTransfer,
            "Profit transferred to operating cash",
        )
    }

    /// Records a tax settlement paid out of the tax sub-wallet.
    ///
    /// The counterparty is the tax authority, outside the platform, so the
    /// settlement is a single audited debit with no internal credit leg.
    ///
    /// # Errors
    ///
    /// Fails without mutation if the tax sub-wallet cannot cover the
    /// amount.
    pub fn record_tax_payment(&self, amount: Amount) -> Result<Transaction, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < 0 {
            return Err(LedgerError::NegativeAmount);
        }

        self.add_transaction(
            AccountRef::Admin(AdminAccount::Tax),
            TransactionKind::Tax,
            -amount,
            "Tax settlement",
            None,
        )
    }

    /// Pays an operational expense out of platform cash into a user wallet.
    ///
    /// The debit leg is audited as `OperationalExpense` on the cash
    /// sub-wallet; the credit leg lands on the recipient as `DanaOpex`.
    ///
    /// # Errors
    ///
    /// Fails without mutation if cash cannot cover the amount or the
    /// recipient has no wallet.
    pub fn record_operational_expense(
        &self,
        recipient: UserId,
        amount: Amount,
        description: &str,
    ) -> Result<(Transaction, Transaction), LedgerError> {
        self.transfer(
            AccountRef::Admin(AdminAccount::Cash),
            AccountRef::User(recipient),
            amount,
            TransactionKind::OperationalExpense,
            TransactionKind::DanaOpex,
            description,
        )
    }

    /// Reads the current balance of any account.
    ///
    /// # Errors
    ///
    /// Returns `WalletNotFound` for a user without a wallet.
    pub fn balance(&self, owner: AccountRef) -> Result<Amount, LedgerError> {
        match owner {
            AccountRef::User(user) => self
                .wallets
                .get(user)
                .map(|w| w.balance)
                .ok_or(LedgerError::WalletNotFound(user)),
            AccountRef::Admin(account) => Ok(self.wallets.admin_balance(account)),
        }
    }

    /// Commits one record plus its balance delta. Caller holds the
    /// account lock.
    fn commit_locked(
        &self,
        owner: AccountRef,
        kind: TransactionKind,
        amount: Amount,
        description: String,
        related_id: Option<TransactionId>,
    ) -> Result<Transaction, LedgerError> {
        let balance = self.validated_balance(owner, amount)?;

        let transaction = Transaction {
            id: TransactionId::new(),
            owner,
            kind,
            amount,
            description,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            related_id,
        };
        self.transactions.append(transaction.clone());
        self.apply_balance(owner, balance + amount);

        info!(owner = %owner, kind = %kind, amount, "ledger commit");
        Ok(transaction)
    }

    /// Validates a prospective delta and returns the current balance.
    fn validated_balance(&self, owner: AccountRef, amount: Amount) -> Result<Amount, LedgerError> {
        match owner {
            AccountRef::User(user) => {
                let wallet = self
                    .wallets
                    .get(user)
                    .ok_or(LedgerError::WalletNotFound(user))?;
                if is_debit(amount) {
                    if wallet.is_frozen {
                        return Err(LedgerError::WalletFrozen(user));
                    }
                    if wallet.balance + amount < 0 {
                        self.notifier.notify(
                            Recipient::User(user),
                            &format!(
                                "Transaction declined: balance {} cannot cover a debit of {}",
                                wallet.balance, -amount
                            ),
                            Severity::Warning,
                        );
                        return Err(LedgerError::InsufficientBalance {
                            balance: wallet.balance,
                            requested: -amount,
                        });
                    }
                }
                Ok(wallet.balance)
            }
            AccountRef::Admin(account) => {
                let balance = self.wallets.admin_balance(account);
                if is_debit(amount) && balance + amount < 0 {
                    return Err(LedgerError::InsufficientBalance {
                        balance,
                        requested: -amount,
                    });
                }
                Ok(balance)
            }
        }
    }

    /// Writes the new balance back. Caller holds the account lock.
    fn apply_balance(&self, owner: AccountRef, new_balance: Amount) {
        match owner {
            AccountRef::User(user) => {
                if let Some(mut wallet) = self.wallets.get(user) {
                    wallet.balance = new_balance;
                    self.wallets.put(wallet);
                }
            }
            AccountRef::Admin(account) => self.wallets.put_admin_balance(account, new_balance),
        }
    }
}
